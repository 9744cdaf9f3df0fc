// node/client.rs
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Client, Request};
use std::future::Future;
use std::time::Duration;

use crate::cookies::CookieJar;
use crate::node::error::NodeError;
use crate::queue::QueuedRequest;

/// Status reported for a request that never got an HTTP answer.
pub const TRANSPORT_FAILURE_STATUS: u16 = 999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeResponse {
    pub status: u16,
    pub body: String,
    /// Cookies set by this response; empty when none were sent.
    pub cookies: CookieJar,
}

impl NodeResponse {
    pub fn transport_failure() -> Self {
        NodeResponse {
            status: TRANSPORT_FAILURE_STATUS,
            body: String::new(),
            cookies: CookieJar::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Performs a single request against the charge node.
pub trait HttpTransport: Send + Sync + 'static {
    fn execute(
        &self,
        request: QueuedRequest,
    ) -> impl Future<Output = Result<NodeResponse, NodeError>> + Send;
}

pub struct NodeClient {
    client: Client,
}

impl NodeClient {
    pub fn new(timeout: Duration) -> Result<Self, NodeError> {
        Ok(NodeClient {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// GET without a payload, form POST with one. The cookie snapshot goes
    /// out as a single `Cookie` header.
    pub fn build_request(&self, request: &QueuedRequest) -> Result<Request, NodeError> {
        let mut builder = match &request.payload {
            Some(form) => self.client.post(&request.url).form(form),
            None => self.client.get(&request.url),
        };
        if let Some(cookies) = request.cookies.header_value() {
            builder = builder.header(COOKIE, HeaderValue::from_str(&cookies)?);
        }
        Ok(builder.build()?)
    }
}

impl HttpTransport for NodeClient {
    async fn execute(&self, request: QueuedRequest) -> Result<NodeResponse, NodeError> {
        let req = self.build_request(&request)?;
        let res = self.client.execute(req).await?;

        let status = res.status().as_u16();
        let cookies: CookieJar = res
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        let body = res.text().await?;

        Ok(NodeResponse {
            status,
            body,
            cookies,
        })
    }
}
