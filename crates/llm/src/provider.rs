use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Trait for chat-completion backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and return the assistant's response text.
    async fn complete(&self, messages: Vec<Message>, temperature: f32) -> Result<String, LlmError>;

    /// Single user-message completion.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.complete(vec![Message::user(prompt)], temperature).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("{0}")]
    NotConfigured(String),
    #[error("401 Unauthorized: invalid {provider} API key. Set {env_key} in your environment or .env file.")]
    Unauthorized { provider: String, env_key: String },
    #[error("429 Too Many Requests: {provider} rate limit hit. Wait a minute and try again.")]
    RateLimited { provider: String },
}
