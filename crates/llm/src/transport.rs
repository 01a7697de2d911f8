use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::provider::LlmError;

/// The parts of an HTTP response the clients act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// Raw `Retry-After` header value, if present.
    pub retry_after: Option<String>,
    /// Lower-cased `Content-Type` header value, if present.
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

/// Outbound HTTP seam. Production uses [`ReqwestTransport`]; tests script replies.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` as JSON with the extra `headers`. Non-2xx statuses are
    /// returned as replies, not errors; only connection-level failures error.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpReply, LlmError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP client with {timeout:?} timeout failed to build ({e}); using defaults");
                reqwest::Client::new()
            });
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpReply, LlmError> {
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let status = response.status().as_u16();
        let retry_after = header(reqwest::header::RETRY_AFTER);
        let content_type = header(reqwest::header::CONTENT_TYPE).map(|ct| ct.to_lowercase());
        let body = response.text().await?;

        Ok(HttpReply {
            status,
            retry_after,
            content_type,
            body,
        })
    }
}
