use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("request to charge node failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("invalid cookie header: {0}")]
    InvalidCookie(#[from] reqwest::header::InvalidHeaderValue),
}
