//! Chat-completion client for OpenAI-compatible services.
//!
//! Each call runs a small state machine over the classified reply:
//! a scaledown 403 is retried once with the other auth header for the rest
//! of that call, 429 is retried with capped backoff, and anything else
//! terminates the call. The resolved provider never changes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use scholar_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::{
    resolve_provider, AuthStyle, ProviderKind, ResolvedProvider, NO_API_KEY, NO_BASE_URL,
};
use crate::retry::RetryPolicy;
use crate::transport::{HttpReply, HttpTransport};

/// What a single HTTP exchange means for the retry logic.
#[derive(Debug)]
enum Outcome {
    Success(String),
    Unauthorized,
    Forbidden(String),
    RateLimited { retry_after: Option<String> },
    Failed { status: u16, body: String },
}

impl From<HttpReply> for Outcome {
    fn from(reply: HttpReply) -> Self {
        match reply.status {
            s if (200..300).contains(&s) => Outcome::Success(reply.body),
            401 => Outcome::Unauthorized,
            403 => Outcome::Forbidden(reply.body),
            429 => Outcome::RateLimited {
                retry_after: reply.retry_after,
            },
            status => Outcome::Failed {
                status,
                body: reply.body,
            },
        }
    }
}

pub struct ChatClient {
    provider: Option<ResolvedProvider>,
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
}

impl ChatClient {
    /// `provider == None` builds an unset client that fails on first use.
    pub fn new(provider: Option<ResolvedProvider>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            provider,
            transport,
            retry: RetryPolicy::default(),
        }
    }

    /// Resolve the provider from configuration. Configuration errors (forced
    /// provider without its key, unknown provider) surface here.
    pub fn from_config(
        config: &LlmConfig,
        model: Option<&str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        let provider = resolve_provider(config, model)?;
        match &provider {
            Some(p) => tracing::info!(
                "LLM provider: {} ({}, model {})",
                p.kind.name(),
                p.base_url,
                p.model
            ),
            None => warn!("No LLM API key configured; summarization will fail until one is set"),
        }
        Ok(Self::new(provider, transport))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider(&self) -> Option<&ResolvedProvider> {
        self.provider.as_ref()
    }

    fn configured(&self) -> Result<&ResolvedProvider, LlmError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| LlmError::NotConfigured(NO_API_KEY.to_string()))?;
        if provider.base_url.trim().is_empty() {
            return Err(LlmError::NotConfigured(NO_BASE_URL.to_string()));
        }
        if provider.api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured(NO_API_KEY.to_string()));
        }
        Ok(provider)
    }

    async fn send(
        &self,
        url: &str,
        provider: &ResolvedProvider,
        style: AuthStyle,
        body: &serde_json::Value,
    ) -> Result<Outcome, LlmError> {
        let headers = [style.header(&provider.api_key)];
        let reply = self.transport.post_json(url, &headers, body).await?;
        debug!("{} replied {}", provider.kind.name(), reply.status);
        Ok(Outcome::from(reply))
    }
}

#[async_trait]
impl LlmProvider for ChatClient {
    async fn complete(&self, messages: Vec<Message>, temperature: f32) -> Result<String, LlmError> {
        let provider = self.configured()?;
        let url = format!("{}/chat/completions", provider.base_url.trim_end_matches('/'));
        let body = json!({
            "model": provider.model,
            "messages": messages,
            "temperature": temperature,
        });

        // Every call starts from the configured style.
        let mut style = provider.auth_style;
        let mut outcome = self.send(&url, provider, style, &body).await?;

        if matches!(outcome, Outcome::Forbidden(_)) && provider.kind == ProviderKind::ScaleDown {
            style = style.alternate();
            warn!("ScaleDown returned 403, retrying with {:?} auth", style);
            outcome = self.send(&url, provider, style, &body).await?;
        }

        let mut attempt = 0;
        while let Outcome::RateLimited { retry_after } = &outcome {
            if attempt >= self.retry.max_retries {
                return Err(LlmError::RateLimited {
                    provider: provider.kind.display_name().to_string(),
                });
            }
            let wait = self.retry.wait_for(attempt, retry_after.as_deref());
            warn!(
                "{} rate limited, retry {}/{} in {:?}",
                provider.kind.name(),
                attempt + 1,
                self.retry.max_retries,
                wait
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
            outcome = self.send(&url, provider, style, &body).await?;
        }

        match outcome {
            Outcome::Success(body) => parse_content(&body),
            Outcome::Unauthorized => Err(LlmError::Unauthorized {
                provider: provider.kind.display_name().to_string(),
                env_key: provider.kind.env_key().to_string(),
            }),
            Outcome::Forbidden(body) => Err(LlmError::ApiError { status: 403, body }),
            Outcome::Failed { status, body } => Err(LlmError::ApiError { status, body }),
            Outcome::RateLimited { .. } => Err(LlmError::RateLimited {
                provider: provider.kind.display_name().to_string(),
            }),
        }
    }
}

fn parse_content(body: &str) -> Result<String, LlmError> {
    let resp: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError(e.to_string()))?;
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))
}

#[cfg(test)]
mod tests;
