//! Provider selection for OpenAI-compatible chat-completion services.

use scholar_core::config::LlmConfig;

use crate::provider::LlmError;

pub const DEFAULT_SCALEDOWN_BASE_URL: &str = "https://api.scaledown.xyz/v1";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Host that never resolved; configured URLs pointing at it are replaced.
const DEAD_SCALEDOWN_HOST: &str = "api.scaledown.ai";

pub const NO_API_KEY: &str =
    "No API key configured. Set SCALEDOWN_API_KEY, GROQ_API_KEY, or OPENAI_API_KEY.";
pub const NO_BASE_URL: &str =
    "No LLM base URL configured. Set LLM_PROVIDER and provider base URL env vars.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    ScaleDown,
    Groq,
    OpenAi,
}

impl ProviderKind {
    /// Detection order when no provider is forced.
    pub const ALL: [ProviderKind; 3] = [ProviderKind::ScaleDown, ProviderKind::Groq, ProviderKind::OpenAi];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "scaledown" => Some(Self::ScaleDown),
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }

    /// Lower-case identifier as accepted by `LLM_PROVIDER`.
    pub fn name(self) -> &'static str {
        match self {
            Self::ScaleDown => "scaledown",
            Self::Groq => "groq",
            Self::OpenAi => "openai",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::ScaleDown => "ScaleDown",
            Self::Groq => "Groq",
            Self::OpenAi => "OpenAI",
        }
    }

    pub fn env_key(self) -> &'static str {
        match self {
            Self::ScaleDown => "SCALEDOWN_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::ScaleDown => DEFAULT_SCALEDOWN_BASE_URL,
            Self::Groq => DEFAULT_GROQ_BASE_URL,
            Self::OpenAi => DEFAULT_OPENAI_BASE_URL,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Groq => "llama-3.3-70b-versatile",
            Self::ScaleDown | Self::OpenAi => "gpt-4o-mini",
        }
    }

    fn api_key(self, config: &LlmConfig) -> Option<&str> {
        match self {
            Self::ScaleDown => config.scaledown_api_key.as_deref(),
            Self::Groq => config.groq_api_key.as_deref(),
            Self::OpenAi => config.openai_api_key.as_deref(),
        }
    }

    fn configured_base_url(self, config: &LlmConfig) -> Option<&str> {
        match self {
            Self::ScaleDown => config.scaledown_base_url.as_deref(),
            Self::Groq => config.groq_base_url.as_deref(),
            Self::OpenAi => config.openai_base_url.as_deref(),
        }
    }
}

/// How the API key is presented to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>`
    ApiKeyHeader,
}

impl AuthStyle {
    pub fn alternate(self) -> Self {
        match self {
            Self::Bearer => Self::ApiKeyHeader,
            Self::ApiKeyHeader => Self::Bearer,
        }
    }

    pub fn header(self, api_key: &str) -> (String, String) {
        match self {
            Self::Bearer => ("Authorization".to_string(), format!("Bearer {api_key}")),
            Self::ApiKeyHeader => ("x-api-key".to_string(), api_key.to_string()),
        }
    }
}

/// Fully resolved endpoint settings, fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub auth_style: AuthStyle,
}

/// Resolve the provider from configuration.
///
/// A forced `LLM_PROVIDER` must have its credential. Without an override the
/// first present credential wins (scaledown, groq, openai). `Ok(None)` means
/// no credential at all: the client is built but fails on first use.
pub fn resolve_provider(
    config: &LlmConfig,
    model: Option<&str>,
) -> Result<Option<ResolvedProvider>, LlmError> {
    let kind = match config.provider_override.as_deref() {
        Some(forced) => {
            let kind = ProviderKind::parse(forced).ok_or_else(|| {
                LlmError::NotConfigured(
                    "Unknown LLM_PROVIDER. Use one of: scaledown, groq, openai.".to_string(),
                )
            })?;
            if kind.api_key(config).is_none() {
                return Err(LlmError::NotConfigured(format!(
                    "LLM_PROVIDER={} but {} is not set.",
                    kind.name(),
                    kind.env_key()
                )));
            }
            kind
        }
        None => match ProviderKind::ALL
            .into_iter()
            .find(|k| k.api_key(config).is_some())
        {
            Some(kind) => kind,
            None => return Ok(None),
        },
    };

    let api_key = kind.api_key(config).unwrap_or_default().to_string();
    let base_url = resolve_base_url(kind, kind.configured_base_url(config));
    let model = model
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or(config.model_override.as_deref())
        .unwrap_or(kind.default_model())
        .to_string();
    let auth_style = if kind == ProviderKind::ScaleDown && config.scaledown_use_x_api_key {
        AuthStyle::ApiKeyHeader
    } else {
        AuthStyle::Bearer
    };

    Ok(Some(ResolvedProvider {
        kind,
        base_url,
        api_key,
        model,
        auth_style,
    }))
}

fn resolve_base_url(kind: ProviderKind, configured: Option<&str>) -> String {
    match configured {
        Some(url) if kind == ProviderKind::ScaleDown && url.contains(DEAD_SCALEDOWN_HOST) => {
            tracing::warn!("{url} does not resolve, using {DEFAULT_SCALEDOWN_BASE_URL}");
            DEFAULT_SCALEDOWN_BASE_URL.to_string()
        }
        Some(url) => url.trim_end_matches('/').to_string(),
        None => kind.default_base_url().to_string(),
    }
}
