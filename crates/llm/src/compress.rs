use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use scholar_core::config::CompressionConfig;

use crate::provider::LlmError;
use crate::transport::HttpTransport;

pub const DEFAULT_COMPRESS_URL: &str = "https://api.scaledown.xyz/compress/raw/";

/// Client for the ScaleDown compression endpoint.
pub struct CompressionClient {
    url: String,
    api_key: Option<String>,
    transport: Arc<dyn HttpTransport>,
}

impl CompressionClient {
    pub fn new(url: &str, api_key: Option<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            url: normalize_url(url),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            transport,
        }
    }

    /// `None` when no compression endpoint is configured.
    pub fn from_config(config: &CompressionConfig, transport: Arc<dyn HttpTransport>) -> Option<Self> {
        config
            .compress_url
            .as_deref()
            .map(|url| Self::new(url, config.api_key.clone(), transport))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn compress(&self, text: &str, context: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::NotConfigured(
                "SCALEDOWN_API_KEY is not set. Add it to your .env file for the compress API."
                    .to_string(),
            )
        })?;

        let body = json!({
            "context": context,
            "prompt": text,
            "scaledown": { "rate": "auto" },
        });
        let headers = [("x-api-key".to_string(), api_key.to_string())];
        let reply = self.transport.post_json(&self.url, &headers, &body).await?;
        debug!("compress replied {} ({} bytes)", reply.status, reply.body.len());

        if !reply.is_success() {
            return Err(LlmError::ApiError {
                status: reply.status,
                body: reply.body,
            });
        }
        if !reply.is_json() {
            return Ok(reply.body);
        }
        Ok(match serde_json::from_str::<Value>(&reply.body) {
            Ok(value) => extract_compressed(value),
            Err(_) => reply.body,
        })
    }
}

/// Exactly one trailing slash.
fn normalize_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

fn extract_compressed(value: Value) -> String {
    if let Value::String(s) = value {
        return s;
    }
    ["compressed", "prompt", "result", "text"]
        .iter()
        .find_map(|field| {
            value
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| value.to_string())
}
