use rocket::serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "kebab-case")]
pub enum ConnectionState {
    Offline,
    Connecting,
    Connected,
}

/// Only meaningful while connected.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "kebab-case")]
pub enum ChargeState {
    NotCharging,
    Charging,
}

/// Fixed set of status markers shown by the presentation side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "kebab-case")]
pub enum DisplayMarker {
    Default,
    Connecting,
    Connected,
    LoginError,
    Updating,
    Ok,
}

impl DisplayMarker {
    pub fn html(&self) -> &'static str {
        match self {
            DisplayMarker::Default => "<html><body></body></html>",
            DisplayMarker::Connecting => "<html><body><p>Connecting...</p></body></html>",
            DisplayMarker::Connected => "<html><body><p>Connected!</p></body></html>",
            DisplayMarker::LoginError => "<html><body><p>Login Error.</p></body></html>",
            DisplayMarker::Updating => "<html><body><p>Updating...</p></body></html>",
            DisplayMarker::Ok => "<html><body><p>OK</p></body></html>",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect when offline, disconnect when connected.
    Connect(Option<Credentials>),
    ChargeStart,
    ChargeStop,
    KeepAlive,
    Suspend,
    Resume,
}

/// What the body of a response is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Html,
    JsonStatus,
}

/// Outward notification emitted on every state transition.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct StatusUpdate {
    pub connection: ConnectionState,
    pub charge: ChargeState,
    pub marker: DisplayMarker,
}

impl Default for StatusUpdate {
    fn default() -> Self {
        StatusUpdate {
            connection: ConnectionState::Offline,
            charge: ChargeState::NotCharging,
            marker: DisplayMarker::Default,
        }
    }
}
