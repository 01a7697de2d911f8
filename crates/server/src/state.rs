use std::sync::Arc;
use std::time::Duration;

use scholar_core::Config;
use scholar_llm::{resolve_provider, CompressionClient, ReqwestTransport};
use scholar_rag::Summarizer;

/// Shared, immutable per-process state. Each request builds its own index.
pub struct AppState {
    pub config: Config,
    pub summarizer: Summarizer,
    /// Client for `/api/compress/`; `None` without `SCALEDOWN_COMPRESS_URL`.
    pub compression: Option<CompressionClient>,
    /// Resolved provider name for `/health`.
    pub llm_provider: Option<&'static str>,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let summarizer = Summarizer::from_config(&config)?;
        let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(
            config.llm.request_timeout_secs,
        )));
        let compression = CompressionClient::from_config(&config.compression, transport);
        let llm_provider = resolve_provider(&config.llm, None)?.map(|p| p.kind.name());

        Ok(Self {
            config,
            summarizer,
            compression,
            llm_provider,
        })
    }

    pub fn summarize_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.summarize_timeout_secs)
    }
}
