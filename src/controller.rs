use log::{debug, info, warn};
use rocket::tokio::sync::mpsc::UnboundedSender;

use crate::config::{AppConfig, NodeConfig};
use crate::cookies::CookieJar;
use crate::models::{
    ChargeState, Command, ConnectionState, Credentials, DisplayMarker, ResponseKind, StatusUpdate,
};
use crate::node::data_models::{charge_control_form, login_form, FormPayload, StatusResponse};
use crate::node::NodeResponse;
use crate::queue::{QueuedRequest, RequestDispatcher, RequestId, RequestQueue};

/// Outcome of a dispatched request, delivered back to the controller.
#[derive(Debug, Clone)]
pub struct Completion {
    pub id: RequestId,
    pub epoch: u64,
    pub kind: ResponseKind,
    pub response: NodeResponse,
}

/// Connection/charge state machine for a single charge node session.
///
/// All mutation goes through [`submit_command`](Self::submit_command),
/// [`on_response`](Self::on_response) and [`tick`](Self::tick), which are
/// expected to run on one task.
pub struct ChargeController<D: RequestDispatcher> {
    node: NodeConfig,
    app: AppConfig,
    dispatcher: D,
    notifier: UnboundedSender<StatusUpdate>,
    connection: ConnectionState,
    charge: ChargeState,
    cookies: CookieJar,
    queue: RequestQueue,
    watchdog_counter: u32,
    ping_counter: u32,
    /// Bumped whenever the session is abandoned; responses from older
    /// epochs are ignored.
    epoch: u64,
    timer_running: bool,
}

impl<D: RequestDispatcher> ChargeController<D> {
    pub fn new(
        node: NodeConfig,
        app: AppConfig,
        dispatcher: D,
        notifier: UnboundedSender<StatusUpdate>,
    ) -> Self {
        ChargeController {
            node,
            app,
            dispatcher,
            notifier,
            connection: ConnectionState::Offline,
            charge: ChargeState::NotCharging,
            cookies: CookieJar::new(),
            queue: RequestQueue::new(),
            watchdog_counter: 0,
            ping_counter: 0,
            epoch: 0,
            timer_running: false,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    pub fn charge_state(&self) -> ChargeState {
        self.charge
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn watchdog_counter(&self) -> u32 {
        self.watchdog_counter
    }

    pub fn ping_counter(&self) -> u32 {
        self.ping_counter
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn submit_command(&mut self, command: Command) {
        self.watchdog_counter = 0;

        match command {
            Command::Connect(credentials) => match self.connection {
                ConnectionState::Connected => self.disconnect(),
                ConnectionState::Offline => match credentials {
                    Some(credentials) => self.connect(&credentials),
                    None => debug!(target: "app", "Connect without credentials ignored"),
                },
                ConnectionState::Connecting => {
                    debug!(target: "app", "Already connecting, connect ignored")
                }
            },
            Command::ChargeStart => self.set_charge(true),
            Command::ChargeStop => self.set_charge(false),
            Command::KeepAlive => {}
            Command::Suspend => {
                // the queue is kept and drains on resume
                info!(target: "app", "Charge node suspended");
                self.abandon_session();
                self.timer_running = false;
            }
            Command::Resume => self.timer_running = true,
        }
    }

    fn connect(&mut self, credentials: &Credentials) {
        info!(target: "app", "Logging in to charge node as {}", credentials.username);
        self.enqueue(
            self.node.login_url.clone(),
            Some(login_form(credentials)),
            ResponseKind::Html,
        );
        self.connection = ConnectionState::Connecting;
        self.charge = ChargeState::NotCharging;
        self.notify(DisplayMarker::Connecting);
        self.timer_running = true;
    }

    fn disconnect(&mut self) {
        info!(target: "app", "Disconnecting from charge node");
        // the charger is switched off on the way out
        self.enqueue_charge_set(false);
        self.connection = ConnectionState::Offline;
        self.charge = ChargeState::NotCharging;
        self.epoch += 1;
        self.notify(DisplayMarker::Default);
    }

    fn set_charge(&mut self, on: bool) {
        if self.connection != ConnectionState::Connected {
            debug!(target: "app", "Charge command ignored while {:?}", self.connection);
            return;
        }
        self.enqueue_charge_set(on);
    }

    fn enqueue_charge_set(&mut self, on: bool) {
        let form = charge_control_form(&self.node.node_id, &self.node.switch_source_id, on);
        self.enqueue(self.node.control_url.clone(), Some(form), ResponseKind::Html);
    }

    fn enqueue(
        &mut self,
        url: String,
        payload: Option<FormPayload>,
        kind: ResponseKind,
    ) -> RequestId {
        let request = QueuedRequest {
            url,
            payload,
            cookies: self.cookies.clone(),
            kind,
        };
        self.queue.enqueue(request, self.epoch)
    }

    /// Handle the outcome of a dispatched request.
    pub fn on_response(&mut self, completion: Completion) {
        self.queue.mark_finished(completion.id);

        if completion.epoch != self.epoch {
            debug!(
                target: "app",
                "Dropping stale response for request {} (status {})",
                completion.id, completion.response.status
            );
            return;
        }

        self.watchdog_counter = 0;
        if self.cookies.replace_with(&completion.response.cookies) {
            debug!(target: "app", "Session cookies updated");
        }

        match completion.kind {
            ResponseKind::Html => self.on_html_response(&completion.response),
            ResponseKind::JsonStatus => self.on_status_response(&completion.response),
        }
    }

    fn on_html_response(&mut self, response: &NodeResponse) {
        match self.connection {
            ConnectionState::Connecting if response.is_ok() => {
                info!(target: "app", "Logged in to charge node");
                self.connection = ConnectionState::Connected;
                self.charge = ChargeState::NotCharging;
                self.ping_counter = 0;
                self.notify(DisplayMarker::Connected);
                self.timer_running = true;
            }
            ConnectionState::Connecting => {
                warn!(target: "app", "Login failed (status: {})", response.status);
                self.connection = ConnectionState::Offline;
                self.charge = ChargeState::NotCharging;
                self.epoch += 1;
                self.notify(DisplayMarker::LoginError);
                self.timer_running = false;
            }
            ConnectionState::Connected if !response.is_ok() => {
                warn!(target: "app", "Charge control request failed (status: {})", response.status);
            }
            _ => {}
        }
    }

    fn on_status_response(&mut self, response: &NodeResponse) {
        if self.connection != ConnectionState::Connected {
            return;
        }
        if !response.is_ok() {
            warn!(target: "app", "Status poll failed (status: {})", response.status);
            return;
        }

        match StatusResponse::parse(&response.body) {
            Ok(status) => {
                self.charge = if status.switch_is_on(&self.node.switch_source_id) {
                    ChargeState::Charging
                } else {
                    ChargeState::NotCharging
                };
                debug!(target: "app", "Charge node reports {:?}", self.charge);
                self.notify(DisplayMarker::Ok);
            }
            Err(e) => {
                warn!(target: "app", "Error parsing status JSON: {}", e);
            }
        }
    }

    /// One watchdog/poll cycle. Returns whether the timer should fire again.
    ///
    /// The timer stops once Offline, except while requests are still queued:
    /// after a disconnect it keeps draining until the charge-off request has
    /// been sent. The watchdog bounds that drain like any other quiet period.
    pub fn tick(&mut self) -> bool {
        if !self.timer_running {
            return false;
        }

        self.watchdog_counter += 1;
        if self.watchdog_counter >= self.app.watchdog_overflow {
            info!(target: "app", "Watchdog overflow, stopping");
            let dropped = self.queue.discard_pending();
            if dropped > 0 {
                debug!(target: "app", "Discarded {} queued requests", dropped);
            }
            self.abandon_session();
            self.timer_running = false;
            return false;
        }

        self.queue.pump(&mut self.dispatcher);

        if self.connection == ConnectionState::Connected {
            self.ping_counter += 1;
            if self.ping_counter >= self.app.send_ping_every {
                self.ping_counter = 0;
                debug!(target: "app", "Ping!");
                self.notify(DisplayMarker::Updating);
                self.enqueue(
                    self.node.status_url.clone(),
                    None,
                    ResponseKind::JsonStatus,
                );
            }
        }

        self.timer_running = self.connection != ConnectionState::Offline || self.queue.has_work();
        self.timer_running
    }

    /// Force Offline/NotCharging and start a new epoch.
    fn abandon_session(&mut self) {
        self.epoch += 1;
        let changed = self.connection != ConnectionState::Offline
            || self.charge != ChargeState::NotCharging;
        self.connection = ConnectionState::Offline;
        self.charge = ChargeState::NotCharging;
        if changed {
            self.notify(DisplayMarker::Default);
        }
    }

    fn notify(&self, marker: DisplayMarker) {
        let update = StatusUpdate {
            connection: self.connection,
            charge: self.charge,
            marker,
        };
        if self.notifier.send(update).is_err() {
            debug!(target: "app", "No listener for status update {:?}", update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TRANSPORT_FAILURE_STATUS;
    use rocket::tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    #[derive(Default)]
    struct Recorder {
        started: Vec<(RequestId, u64, QueuedRequest)>,
    }

    impl RequestDispatcher for Recorder {
        fn dispatch(&mut self, id: RequestId, epoch: u64, request: QueuedRequest) {
            self.started.push((id, epoch, request));
        }
    }

    type Controller = ChargeController<Recorder>;

    fn node_config() -> NodeConfig {
        NodeConfig {
            login_url: "http://node/login".to_string(),
            status_url: "http://node/status".to_string(),
            control_url: "http://node/control".to_string(),
            node_id: "30".to_string(),
            switch_source_id: "/power/switch/2".to_string(),
            request_timeout_secs: 10,
        }
    }

    fn get_controller() -> (Controller, UnboundedReceiver<StatusUpdate>) {
        let (tx, rx) = unbounded_channel();
        let controller = ChargeController::new(node_config(), AppConfig::new(), Recorder::default(), tx);
        (controller, rx)
    }

    fn credentials() -> Option<Credentials> {
        Some(Credentials {
            username: "user".to_string(),
            password: "password".to_string(),
        })
    }

    fn drain(rx: &mut UnboundedReceiver<StatusUpdate>) -> Vec<StatusUpdate> {
        let mut updates = vec![];
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Complete the request that was started last.
    fn respond(controller: &mut Controller, status: u16, body: &str, cookies: CookieJar) {
        let (id, epoch, request) = controller
            .dispatcher()
            .started
            .last()
            .cloned()
            .expect("a started request");
        controller.on_response(Completion {
            id,
            epoch,
            kind: request.kind,
            response: NodeResponse {
                status,
                body: body.to_string(),
                cookies,
            },
        });
    }

    fn connected_controller() -> (Controller, UnboundedReceiver<StatusUpdate>) {
        let (mut controller, mut rx) = get_controller();
        controller.submit_command(Command::Connect(credentials()));
        controller.tick();
        respond(&mut controller, 200, "<html></html>", [("JSESSIONID", "s1")].into_iter().collect());
        drain(&mut rx);
        (controller, rx)
    }

    /// Tick until the next status poll has been started.
    fn tick_until_poll_started(controller: &mut Controller) {
        let before = controller.dispatcher().started.len();
        for _ in 0..controller.app.send_ping_every + 1 {
            controller.submit_command(Command::KeepAlive);
            controller.tick();
            if controller.dispatcher().started.len() > before {
                return;
            }
        }
        panic!("no status poll was started");
    }

    #[test]
    fn test_connect_then_login_ok() {
        let (mut controller, mut rx) = get_controller();
        controller.submit_command(Command::Connect(credentials()));

        assert_eq!(controller.connection_state(), ConnectionState::Connecting);
        assert!(controller.is_timer_running());
        assert_eq!(drain(&mut rx)[0].marker, DisplayMarker::Connecting);

        controller.tick();
        let (_, _, login) = &controller.dispatcher().started[0];
        assert_eq!(login.url, "http://node/login");
        assert_eq!(login.payload.as_ref().unwrap()[0], ("j_username".to_string(), "user".to_string()));

        respond(&mut controller, 200, "", CookieJar::new());
        assert_eq!(controller.connection_state(), ConnectionState::Connected);
        assert_eq!(controller.charge_state(), ChargeState::NotCharging);
        assert_eq!(
            drain(&mut rx),
            vec![StatusUpdate {
                connection: ConnectionState::Connected,
                charge: ChargeState::NotCharging,
                marker: DisplayMarker::Connected,
            }]
        );
    }

    #[test]
    fn test_login_rejected_stops_timer() {
        let (mut controller, mut rx) = get_controller();
        controller.submit_command(Command::Connect(credentials()));
        controller.tick();
        respond(&mut controller, 403, "Forbidden", CookieJar::new());

        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        assert_eq!(controller.charge_state(), ChargeState::NotCharging);
        assert!(!controller.is_timer_running());
        assert_eq!(drain(&mut rx).last().unwrap().marker, DisplayMarker::LoginError);

        for _ in 0..20 {
            assert!(!controller.tick());
        }
        assert_eq!(controller.dispatcher().started.len(), 1);
    }

    #[test]
    fn test_transport_failure_during_login_is_a_login_error() {
        let (mut controller, mut rx) = get_controller();
        controller.submit_command(Command::Connect(credentials()));
        controller.tick();
        respond(&mut controller, TRANSPORT_FAILURE_STATUS, "", CookieJar::new());

        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        assert_eq!(drain(&mut rx).last().unwrap().marker, DisplayMarker::LoginError);
    }

    #[test]
    fn test_connect_without_credentials_is_ignored() {
        let (mut controller, mut rx) = get_controller();
        controller.submit_command(Command::Connect(None));

        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        assert!(controller.queue().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_charge_commands_ignored_while_offline() {
        let (mut controller, _rx) = get_controller();
        controller.submit_command(Command::ChargeStart);
        controller.submit_command(Command::ChargeStop);
        assert!(controller.queue().is_empty());
    }

    #[test]
    fn test_charge_start_queues_switch_on() {
        let (mut controller, _rx) = connected_controller();
        controller.submit_command(Command::ChargeStart);
        controller.tick();
        controller.tick();

        let (_, _, request) = controller.dispatcher().started.last().unwrap();
        assert_eq!(request.url, "http://node/control");
        let payload = request.payload.as_ref().unwrap();
        assert!(payload.contains(&("parameters[0].value".to_string(), "1".to_string())));
        assert!(payload.contains(&("parameters[0].name".to_string(), "/power/switch/2".to_string())));
        // state only changes once a poll confirms it
        assert_eq!(controller.charge_state(), ChargeState::NotCharging);
    }

    #[test]
    fn test_status_poll_reports_charging() {
        let (mut controller, mut rx) = connected_controller();
        tick_until_poll_started(&mut controller);

        respond(
            &mut controller,
            200,
            r#"{"data":[{"sourceId":"/power/switch/2","integerValue":1}]}"#,
            CookieJar::new(),
        );
        assert_eq!(controller.charge_state(), ChargeState::Charging);
        let updates = drain(&mut rx);
        assert_eq!(updates.first().unwrap().marker, DisplayMarker::Updating);
        assert_eq!(
            *updates.last().unwrap(),
            StatusUpdate {
                connection: ConnectionState::Connected,
                charge: ChargeState::Charging,
                marker: DisplayMarker::Ok,
            }
        );

        tick_until_poll_started(&mut controller);
        respond(&mut controller, 200, r#"{"data":[]}"#, CookieJar::new());
        assert_eq!(controller.charge_state(), ChargeState::NotCharging);
    }

    #[test]
    fn test_malformed_status_changes_nothing() {
        let (mut controller, mut rx) = connected_controller();
        tick_until_poll_started(&mut controller);
        respond(&mut controller, 200, r#"{"data":[{"sourceId":"/power/switch/2","integerValue":1}]}"#, CookieJar::new());
        drain(&mut rx);

        tick_until_poll_started(&mut controller);
        drain(&mut rx);
        respond(&mut controller, 200, "this is { not json", CookieJar::new());

        assert_eq!(controller.connection_state(), ConnectionState::Connected);
        assert_eq!(controller.charge_state(), ChargeState::Charging);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_transport_failure_while_connected_is_ignored() {
        let (mut controller, mut rx) = connected_controller();
        tick_until_poll_started(&mut controller);
        drain(&mut rx);
        respond(&mut controller, TRANSPORT_FAILURE_STATUS, "", CookieJar::new());

        assert_eq!(controller.connection_state(), ConnectionState::Connected);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_login_cookies_sent_with_next_poll() {
        let (mut controller, _rx) = connected_controller();
        tick_until_poll_started(&mut controller);

        let (_, _, poll) = controller.dispatcher().started.last().unwrap();
        assert_eq!(poll.url, "http://node/status");
        assert!(poll.payload.is_none());
        assert_eq!(poll.cookies.get("JSESSIONID"), Some("s1"));
        assert_eq!(poll.cookies.header_value().as_deref(), Some("JSESSIONID=s1"));
    }

    #[test]
    fn test_new_cookies_replace_the_jar() {
        let (mut controller, _rx) = connected_controller();
        tick_until_poll_started(&mut controller);
        respond(&mut controller, 200, r#"{"data":[]}"#, [("JSESSIONID", "s2")].into_iter().collect());
        assert_eq!(controller.cookies().get("JSESSIONID"), Some("s2"));

        tick_until_poll_started(&mut controller);
        respond(&mut controller, 200, r#"{"data":[]}"#, CookieJar::new());
        assert_eq!(controller.cookies().get("JSESSIONID"), Some("s2"));
    }

    #[test]
    fn test_ping_counter_overflow_enqueues_one_poll() {
        let (mut controller, _rx) = connected_controller();
        let every = controller.app.send_ping_every;

        for i in 1..every {
            controller.submit_command(Command::KeepAlive);
            controller.tick();
            assert_eq!(controller.ping_counter(), i);
        }
        assert!(controller.queue().is_empty());

        controller.submit_command(Command::KeepAlive);
        controller.tick();
        assert_eq!(controller.ping_counter(), 0);
        let polls = controller
            .queue()
            .iter()
            .filter(|unit| unit.request.kind == ResponseKind::JsonStatus)
            .count();
        assert_eq!(polls, 1);
    }

    #[test]
    fn test_ping_counter_idle_while_connecting() {
        let (mut controller, _rx) = get_controller();
        controller.submit_command(Command::Connect(credentials()));
        for _ in 0..5 {
            controller.tick();
            assert_eq!(controller.ping_counter(), 0);
        }
    }

    #[test]
    fn test_watchdog_counts_ticks_and_resets_on_activity() {
        let (mut controller, _rx) = connected_controller();
        controller.tick();
        controller.tick();
        assert_eq!(controller.watchdog_counter(), 2);

        controller.submit_command(Command::KeepAlive);
        assert_eq!(controller.watchdog_counter(), 0);

        controller.tick();
        assert_eq!(controller.watchdog_counter(), 1);
    }

    #[test]
    fn test_watchdog_overflow_drops_connection() {
        let (mut controller, mut rx) = connected_controller();
        let overflow = controller.app.watchdog_overflow;

        for _ in 1..overflow {
            assert!(controller.tick());
        }
        assert_eq!(controller.connection_state(), ConnectionState::Connected);

        assert!(!controller.tick());
        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        assert_eq!(controller.charge_state(), ChargeState::NotCharging);
        assert!(!controller.is_timer_running());
        assert_eq!(drain(&mut rx).last().unwrap().marker, DisplayMarker::Default);

        let started = controller.dispatcher().started.len();
        controller.tick();
        assert_eq!(controller.dispatcher().started.len(), started);
    }

    #[test]
    fn test_late_response_after_watchdog_is_ignored() {
        let (mut controller, mut rx) = connected_controller();
        tick_until_poll_started(&mut controller);
        for _ in 0..controller.app.watchdog_overflow {
            controller.tick();
        }
        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        drain(&mut rx);

        respond(
            &mut controller,
            200,
            r#"{"data":[{"sourceId":"/power/switch/2","integerValue":1}]}"#,
            [("JSESSIONID", "late")].into_iter().collect(),
        );
        assert_eq!(controller.charge_state(), ChargeState::NotCharging);
        assert_eq!(controller.cookies().get("JSESSIONID"), Some("s1"));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_disconnect_switches_charger_off() {
        let (mut controller, mut rx) = connected_controller();
        controller.submit_command(Command::Connect(None));

        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        assert_eq!(drain(&mut rx).last().unwrap().marker, DisplayMarker::Default);

        // the timer keeps running until the charge-off request is out
        assert!(controller.tick());
        let (_, _, request) = controller.dispatcher().started.last().unwrap();
        assert_eq!(request.url, "http://node/control");
        assert!(request
            .payload
            .as_ref()
            .unwrap()
            .contains(&("parameters[0].value".to_string(), "0".to_string())));

        respond(&mut controller, 200, "", CookieJar::new());
        assert!(!controller.tick());
        assert!(controller.queue().is_empty());
    }

    #[test]
    fn test_charge_off_reply_is_not_taken_as_login() {
        let (mut controller, _rx) = connected_controller();
        controller.submit_command(Command::Connect(None));
        controller.tick();
        controller.submit_command(Command::Connect(credentials()));
        assert_eq!(controller.connection_state(), ConnectionState::Connecting);

        // reply to the charge-off request issued by the old session
        respond(&mut controller, 200, "", CookieJar::new());
        assert_eq!(controller.connection_state(), ConnectionState::Connecting);

        controller.tick();
        let (_, _, request) = controller.dispatcher().started.last().unwrap();
        assert_eq!(request.url, "http://node/login");
        respond(&mut controller, 200, "", CookieJar::new());
        assert_eq!(controller.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn test_suspend_and_resume() {
        let (mut controller, mut rx) = connected_controller();
        controller.submit_command(Command::Suspend);

        assert_eq!(controller.connection_state(), ConnectionState::Offline);
        assert!(!controller.is_timer_running());
        assert_eq!(drain(&mut rx).last().unwrap().marker, DisplayMarker::Default);

        controller.submit_command(Command::Resume);
        assert!(controller.is_timer_running());
        // offline with nothing queued: one tick and the timer stops again
        assert!(!controller.tick());
    }

    #[test]
    fn test_suspend_after_disconnect_still_switches_charger_off() {
        let (mut controller, _rx) = connected_controller();
        controller.submit_command(Command::Connect(None));
        controller.submit_command(Command::Suspend);

        assert!(!controller.is_timer_running());
        assert_eq!(controller.queue().len(), 2);

        controller.submit_command(Command::Resume);
        assert!(controller.tick());
        let (_, _, request) = controller.dispatcher().started.last().unwrap();
        assert_eq!(request.url, "http://node/control");
        assert!(request
            .payload
            .as_ref()
            .unwrap()
            .contains(&("parameters[0].value".to_string(), "0".to_string())));
    }

    #[test]
    fn test_odd_status_entries_do_not_block_charging() {
        let (mut controller, mut rx) = connected_controller();
        tick_until_poll_started(&mut controller);
        drain(&mut rx);

        respond(
            &mut controller,
            200,
            r#"{"data":[
                {"sourceId":"/power/switch/2","integerValue":1},
                {"sourceId":"/temp/1","integerValue":21.5},
                {"sourceId":12,"integerValue":"on"}
            ]}"#,
            CookieJar::new(),
        );
        assert_eq!(controller.charge_state(), ChargeState::Charging);
        assert_eq!(drain(&mut rx).last().unwrap().marker, DisplayMarker::Ok);
    }

    #[test]
    fn test_never_more_than_one_request_running() {
        let (mut controller, _rx) = connected_controller();
        for i in 0..60 {
            controller.submit_command(if i % 2 == 0 {
                Command::ChargeStart
            } else {
                Command::ChargeStop
            });
            controller.tick();
            assert!(controller.queue().running_count() <= 1);
            if i % 3 == 0 {
                respond(&mut controller, 200, "", CookieJar::new());
            }
        }
    }
}
