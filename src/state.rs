use crate::models::{Command, StatusUpdate};
use crate::service::{ChargeNodeHandle, ServiceStopped};
use chrono::{DateTime, Utc};
use log::info;
use rocket::serde::Serialize;
use rocket::tokio;
use rocket::tokio::sync::mpsc::UnboundedReceiver;
use rocket::tokio::sync::Mutex;
use rocket::tokio::task::JoinHandle;
use std::sync::Arc;

#[derive(Debug, Serialize, Clone, Copy)]
#[serde(crate = "rocket::serde")]
pub struct StatusView {
    #[serde(flatten)]
    pub status: StatusUpdate,
    pub updated_at: DateTime<Utc>,
}

pub struct AppState {
    pub charge_node: ChargeNodeHandle,
    pub latest: Mutex<StatusView>,
}

impl AppState {
    pub fn new(charge_node: ChargeNodeHandle) -> Self {
        AppState {
            charge_node,
            latest: Mutex::new(StatusView {
                status: StatusUpdate::default(),
                updated_at: Utc::now(),
            }),
        }
    }

    pub fn submit(&self, command: Command) -> Result<(), ServiceStopped> {
        self.charge_node.submit(command)
    }

    /// Remember the most recent status update
    pub async fn record(&self, status: StatusUpdate) {
        *self.latest.lock().await = StatusView {
            status,
            updated_at: Utc::now(),
        };
    }

    pub async fn status(&self) -> StatusView {
        *self.latest.lock().await
    }

    /// Start a background task that keeps `latest` in sync with the
    /// controller's notifications.
    pub fn watch_updates(
        state: &Arc<AppState>,
        mut updates: UnboundedReceiver<StatusUpdate>,
    ) -> JoinHandle<()> {
        let state_clone = state.clone();
        tokio::spawn(async move {
            while let Some(update) = updates.recv().await {
                info!(
                    target: "app",
                    "Charge node: {:?}/{:?} ({:?})",
                    update.connection, update.charge, update.marker
                );
                state_clone.record(update).await;
            }
        })
    }
}
