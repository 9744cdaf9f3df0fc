pub mod client;
pub mod data_models;
pub mod error;

pub use client::{HttpTransport, NodeClient, NodeResponse, TRANSPORT_FAILURE_STATUS};
pub use error::NodeError;
