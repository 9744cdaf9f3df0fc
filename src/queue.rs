use crate::cookies::CookieJar;
use crate::models::ResponseKind;
use crate::node::data_models::FormPayload;
use log::debug;
use std::collections::VecDeque;
use std::fmt;

/// One outbound call to the charge node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRequest {
    pub url: String,
    /// Sent form-encoded with a POST; `None` means a plain GET.
    pub payload: Option<FormPayload>,
    /// Session cookies as they were when the request was queued.
    pub cookies: CookieJar,
    pub kind: ResponseKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    Running,
    Finished,
}

#[derive(Debug)]
pub struct RequestUnit {
    pub id: RequestId,
    /// Session epoch the request was issued under.
    pub epoch: u64,
    pub request: QueuedRequest,
    lifecycle: Lifecycle,
}

impl RequestUnit {
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn is_finished(&self) -> bool {
        self.lifecycle == Lifecycle::Finished
    }
}

/// Starts a request off the caller's thread. Implementations must report
/// the outcome back exactly once and must not block.
pub trait RequestDispatcher {
    fn dispatch(&mut self, id: RequestId, epoch: u64, request: QueuedRequest);
}

/// FIFO of pending requests with at most one in flight.
#[derive(Debug, Default)]
pub struct RequestQueue {
    units: VecDeque<RequestUnit>,
    next_id: u64,
}

impl RequestQueue {
    pub fn new() -> Self {
        RequestQueue::default()
    }

    pub fn enqueue(&mut self, request: QueuedRequest, epoch: u64) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        debug!(target: "app", "Queued request {} to {}", id, request.url);
        self.units.push_back(RequestUnit {
            id,
            epoch,
            request,
            lifecycle: Lifecycle::NotStarted,
        });
        id
    }

    /// Advance the head of the queue without blocking:
    /// start it if idle, drop it and start the next one if finished,
    /// leave it alone while it runs.
    pub fn pump(&mut self, dispatcher: &mut impl RequestDispatcher) {
        let Some(head) = self.units.front() else {
            return;
        };
        match head.lifecycle {
            Lifecycle::Running => {}
            Lifecycle::NotStarted => self.start_head(dispatcher),
            Lifecycle::Finished => {
                if let Some(done) = self.units.pop_front() {
                    debug!(target: "app", "Request {} done, removed from queue", done.id);
                }
                self.start_head(dispatcher);
            }
        }
    }

    fn start_head(&mut self, dispatcher: &mut impl RequestDispatcher) {
        if let Some(head) = self.units.front_mut() {
            if head.lifecycle == Lifecycle::NotStarted {
                head.lifecycle = Lifecycle::Running;
                debug!(target: "app", "Starting request {}", head.id);
                dispatcher.dispatch(head.id, head.epoch, head.request.clone());
            }
        }
    }

    /// Record that the request `id` delivered its outcome.
    /// Returns false for ids that are not in flight.
    pub fn mark_finished(&mut self, id: RequestId) -> bool {
        match self.units.iter_mut().find(|unit| unit.id == id) {
            Some(unit) if unit.lifecycle == Lifecycle::Running => {
                unit.lifecycle = Lifecycle::Finished;
                true
            }
            _ => false,
        }
    }

    /// Drop every request that has not been started yet.
    pub fn discard_pending(&mut self) -> usize {
        let before = self.units.len();
        self.units.retain(|unit| unit.lifecycle != Lifecycle::NotStarted);
        before - self.units.len()
    }

    /// Whether anything still needs pumping, including a finished head
    /// waiting to be removed.
    pub fn has_work(&self) -> bool {
        !self.units.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_running()).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestUnit> {
        self.units.iter()
    }
}
