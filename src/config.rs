use rocket::serde::de::DeserializeOwned;
use rocket::serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct Config {
    pub node: NodeConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(crate = "rocket::serde")]
pub struct NodeConfig {
    pub login_url: String,
    pub status_url: String,
    pub control_url: String,
    #[serde(default = "NodeConfig::default_node_id")]
    pub node_id: String,
    /// `sourceId` of the switch that feeds the charger
    #[serde(default = "NodeConfig::default_switch_source_id")]
    pub switch_source_id: String,
    #[serde(default = "NodeConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl NodeConfig {
    fn default_node_id() -> String {
        "30".to_string()
    }

    fn default_switch_source_id() -> String {
        "/power/switch/2".to_string()
    }

    fn default_request_timeout() -> u64 {
        10
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(crate = "rocket::serde", default)]
pub struct AppConfig {
    pub tick_interval_ms: u64,
    /// number of ticks between two status polls while connected
    pub send_ping_every: u32,
    /// number of quiet ticks after which the session is abandoned
    pub watchdog_overflow: u32,
}

impl AppConfig {
    pub fn new() -> Self {
        AppConfig {
            tick_interval_ms: 500,
            send_ping_every: 10,
            watchdog_overflow: 8,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::new()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn read_config<T: DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}
