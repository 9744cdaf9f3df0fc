use log::{debug, info, warn};
use rocket::tokio;
use rocket::tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use rocket::tokio::time::{sleep_until, Instant};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{AppConfig, NodeConfig};
use crate::controller::{ChargeController, Completion};
use crate::models::{Command, StatusUpdate};
use crate::node::{HttpTransport, NodeResponse};
use crate::queue::{QueuedRequest, RequestDispatcher, RequestId};

#[derive(Debug, Error)]
#[error("charge node service has stopped")]
pub struct ServiceStopped;

/// Runs each request on its own task and posts the outcome back to the
/// controller's completion channel.
pub struct SpawningDispatcher<T: HttpTransport> {
    transport: Arc<T>,
    completions: UnboundedSender<Completion>,
}

impl<T: HttpTransport> RequestDispatcher for SpawningDispatcher<T> {
    fn dispatch(&mut self, id: RequestId, epoch: u64, request: QueuedRequest) {
        let transport = self.transport.clone();
        let completions = self.completions.clone();
        let kind = request.kind;
        let url = request.url.clone();

        tokio::spawn(async move {
            let response = match transport.execute(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(target: "app", "Request {} to {} failed: {}", id, url, e);
                    NodeResponse::transport_failure()
                }
            };
            let completion = Completion {
                id,
                epoch,
                kind,
                response,
            };
            if completions.send(completion).is_err() {
                debug!(target: "app", "Controller gone, dropping response for request {}", id);
            }
        });
    }
}

/// Sends commands to a running charge node service.
#[derive(Clone)]
pub struct ChargeNodeHandle {
    commands: UnboundedSender<Command>,
}

impl ChargeNodeHandle {
    pub fn submit(&self, command: Command) -> Result<(), ServiceStopped> {
        self.commands.send(command).map_err(|_| ServiceStopped)
    }
}

pub struct ChargeNodeService;

impl ChargeNodeService {
    /// Start the controller task. It runs until every handle is dropped and
    /// emits a [`StatusUpdate`] on the returned receiver for each transition.
    pub fn spawn<T: HttpTransport>(
        node: NodeConfig,
        app: AppConfig,
        transport: T,
    ) -> (ChargeNodeHandle, UnboundedReceiver<StatusUpdate>) {
        let (command_tx, command_rx) = unbounded_channel();
        let (completion_tx, completion_rx) = unbounded_channel();
        let (status_tx, status_rx) = unbounded_channel();

        let interval = app.tick_interval();
        let dispatcher = SpawningDispatcher {
            transport: Arc::new(transport),
            completions: completion_tx,
        };
        let controller = ChargeController::new(node, app, dispatcher, status_tx);

        tokio::spawn(Self::run(controller, command_rx, completion_rx, interval));

        (
            ChargeNodeHandle {
                commands: command_tx,
            },
            status_rx,
        )
    }

    async fn run<T: HttpTransport>(
        mut controller: ChargeController<SpawningDispatcher<T>>,
        mut commands: UnboundedReceiver<Command>,
        mut completions: UnboundedReceiver<Completion>,
        interval: Duration,
    ) {
        info!(target: "app", "Charge node service started");
        let mut deadline: Option<Instant> = None;

        loop {
            if controller.is_timer_running() {
                deadline.get_or_insert_with(|| Instant::now() + interval);
            } else {
                deadline = None;
            }
            let at = deadline;
            let timer = async move {
                match at {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => controller.submit_command(command),
                    None => break,
                },
                Some(completion) = completions.recv() => controller.on_response(completion),
                _ = timer => {
                    deadline = None;
                    controller.tick();
                }
            }
        }
        info!(target: "app", "Charge node service stopped");
    }
}
