use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Default description sent as `context` to the compression endpoint.
pub const DEFAULT_COMPRESSION_CONTEXT: &str =
    "Academic research paper. Preserve technical terms, methods, results, and numerical findings.";

/// Reads configuration values through a lookup function so tests can feed a map
/// instead of mutating the process environment.
struct Vars<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Vars<'_> {
    /// Trimmed value, `None` when absent or blank.
    fn opt(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn flag(&self, key: &str) -> bool {
        self.opt(key).map(|v| is_truthy(&v)).unwrap_or(false)
    }
}

/// Interpret a boolean-ish env value. Inline `# comments` (common in .env
/// files) are ignored.
pub fn is_truthy(raw: &str) -> bool {
    let value = raw.split('#').next().unwrap_or("").trim().to_lowercase();
    matches!(value.as_str(), "1" | "true" | "yes" | "y" | "on")
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub compression: CompressionConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub chunking: ChunkingConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an explicit key/value map.
    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build config from any lookup function. Resolution happens once; the
    /// resulting value is immutable and passed explicitly to the components.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup: &lookup };
        Self {
            server: ServerConfig::from_vars(&vars),
            llm: LlmConfig::from_vars(&vars),
            compression: CompressionConfig::from_vars(&vars),
            embedding: EmbeddingConfig::from_vars(&vars),
            retrieval: RetrievalConfig::from_vars(&vars),
            chunking: ChunkingConfig::from_vars(&vars),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  server:      {}:{} (max upload {} MB)",
            self.server.host,
            self.server.port,
            self.server.max_upload_mb
        );
        tracing::info!(
            "  llm:         provider={}, model={}",
            self.llm.provider_override.as_deref().unwrap_or("(auto)"),
            self.llm.model_override.as_deref().unwrap_or("(default)")
        );
        tracing::info!(
            "  compression: endpoint={}, mode={:?}",
            self.compression.compress_url.as_deref().unwrap_or("(none)"),
            self.compression.mode
        );
        tracing::info!(
            "  embedding:   provider={}, dimensions={}",
            self.embedding.provider,
            self.embedding.dimensions
        );
        tracing::info!("  retrieval:   k={}", self.retrieval.top_k);
        tracing::info!(
            "  chunking:    size={}, overlap={}",
            self.chunking.chunk_size,
            self.chunking.chunk_overlap
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "llm": {
                "provider_override": self.llm.provider_override,
                "model_override": self.llm.model_override,
                "configured": self.llm.is_configured(),
            },
            "compression": {
                "endpoint_configured": self.compression.compress_url.is_some(),
                "mode": self.compression.mode,
            },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
            },
            "retrieval": { "top_k": self.retrieval.top_k },
            "chunking": {
                "chunk_size": self.chunking.chunk_size,
                "chunk_overlap": self.chunking.chunk_overlap,
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
    /// Upper bound on one whole summarize request, end to end.
    pub summarize_timeout_secs: u64,
}

impl ServerConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            host: v.or("HOST", "0.0.0.0"),
            port: v.parsed("PORT", 8000),
            max_upload_mb: v.parsed("MAX_UPLOAD_MB", 50),
            summarize_timeout_secs: v.parsed("SUMMARIZE_TIMEOUT_SECS", 300),
        }
    }
}

// ── LLM (ScaleDown / Groq / OpenAI) ───────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Forces "scaledown", "groq" or "openai" when set.
    pub provider_override: Option<String>,
    pub model_override: Option<String>,
    pub scaledown_api_key: Option<String>,
    pub scaledown_base_url: Option<String>,
    /// Send `x-api-key` instead of `Authorization: Bearer` to ScaleDown.
    pub scaledown_use_x_api_key: bool,
    pub groq_api_key: Option<String>,
    pub groq_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl LlmConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            provider_override: v.opt("LLM_PROVIDER").map(|p| p.to_lowercase()),
            model_override: v.opt("LLM_MODEL"),
            scaledown_api_key: v.opt("SCALEDOWN_API_KEY"),
            scaledown_base_url: v.opt("SCALEDOWN_BASE_URL"),
            scaledown_use_x_api_key: v.flag("SCALEDOWN_USE_X_API_KEY"),
            groq_api_key: v.opt("GROQ_API_KEY"),
            groq_base_url: v.opt("GROQ_BASE_URL"),
            openai_api_key: v.opt("OPENAI_API_KEY"),
            openai_base_url: v.opt("OPENAI_BASE_URL"),
            request_timeout_secs: v.parsed("LLM_REQUEST_TIMEOUT_SECS", 60),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider_override.as_deref() {
            Some("scaledown") => self.scaledown_api_key.is_some(),
            Some("groq") => self.groq_api_key.is_some(),
            Some("openai") => self.openai_api_key.is_some(),
            Some(_) => false,
            None => {
                self.scaledown_api_key.is_some()
                    || self.groq_api_key.is_some()
                    || self.openai_api_key.is_some()
            }
        }
    }
}

// ── Compression ───────────────────────────────────────────────

/// What to do with chunks when no compression endpoint is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// Leave chunks untouched (no extra external calls).
    Passthrough,
    /// Rewrite each chunk with one chat completion.
    Llm,
}

impl CompressionMode {
    /// Case-insensitive; `None` for anything unrecognised.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "passthrough" => Some(Self::Passthrough),
            "llm" => Some(Self::Llm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub compress_url: Option<String>,
    pub api_key: Option<String>,
    pub mode: CompressionMode,
    pub context: String,
    /// Max in-flight per-chunk compression calls (1 = sequential).
    pub concurrency: usize,
}

impl CompressionConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        let raw_mode = v.or("COMPRESSION_MODE", "passthrough");
        let mode = CompressionMode::parse(&raw_mode).unwrap_or_else(|| {
            tracing::warn!("Unknown COMPRESSION_MODE '{raw_mode}', using passthrough");
            CompressionMode::Passthrough
        });
        Self {
            compress_url: v.opt("SCALEDOWN_COMPRESS_URL"),
            api_key: v.opt("SCALEDOWN_API_KEY"),
            mode,
            context: v.or("COMPRESSION_CONTEXT", DEFAULT_COMPRESSION_CONTEXT),
            concurrency: v.parsed("COMPRESSION_CONCURRENCY", 1usize).max(1),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "hash", "openai", "ollama"
    pub provider: String,
    pub model: Option<String>,
    pub dimensions: usize,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub ollama_url: String,
}

impl EmbeddingConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            provider: v.or("EMBEDDING_PROVIDER", "hash").to_lowercase(),
            model: v.opt("EMBEDDING_MODEL"),
            dimensions: v.parsed("EMBEDDING_DIMENSIONS", 384usize).max(1),
            base_url: v.opt("EMBEDDING_BASE_URL"),
            api_key: v.opt("EMBEDDING_API_KEY").or_else(|| v.opt("OPENAI_API_KEY")),
            batch_size: v.parsed("EMBEDDING_BATCH_SIZE", 64usize).max(1),
            ollama_url: v.or("OLLAMA_URL", "http://localhost:11434"),
        }
    }
}

// ── Retrieval / chunking ──────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl RetrievalConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            top_k: v.parsed("RETRIEVE_K", 6),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            chunk_size: v.parsed("CHUNK_SIZE", 1200),
            chunk_overlap: v.parsed("CHUNK_OVERLAP", 200),
        }
    }
}
