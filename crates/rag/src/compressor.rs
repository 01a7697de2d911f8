//! Per-chunk compression before embedding.
//!
//! The strategy comes from configuration, never from the chunk content:
//! a configured compression endpoint wins, `COMPRESSION_MODE=llm` opts into
//! chat-completion compression, and everything else passes chunks through.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use scholar_core::config::{CompressionConfig, CompressionMode};
use scholar_llm::{CompressionClient, HttpTransport, LlmProvider};

use crate::error::RagError;

const LLM_COMPRESS_INSTRUCTION: &str = "Compress academic text without losing technical meaning.";

pub enum CompressionStrategy {
    Remote { client: CompressionClient, context: String },
    Passthrough,
    Llm(Arc<dyn LlmProvider>),
}

pub struct Compressor {
    strategy: CompressionStrategy,
    concurrency: usize,
}

impl Compressor {
    pub fn new(strategy: CompressionStrategy, concurrency: usize) -> Self {
        Self {
            strategy,
            concurrency: concurrency.max(1),
        }
    }

    pub fn passthrough() -> Self {
        Self::new(CompressionStrategy::Passthrough, 1)
    }

    pub fn from_config(
        config: &CompressionConfig,
        llm: Arc<dyn LlmProvider>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let strategy = match CompressionClient::from_config(config, transport) {
            Some(client) => CompressionStrategy::Remote {
                client,
                context: config.context.clone(),
            },
            None if config.mode == CompressionMode::Llm => CompressionStrategy::Llm(llm),
            None => CompressionStrategy::Passthrough,
        };
        Self::new(strategy, config.concurrency)
    }

    pub fn mode_name(&self) -> &'static str {
        match self.strategy {
            CompressionStrategy::Remote { .. } => "remote",
            CompressionStrategy::Passthrough => "passthrough",
            CompressionStrategy::Llm(_) => "llm",
        }
    }

    /// One output per input, same order. The first failing chunk fails the call.
    pub async fn compress(&self, chunks: Vec<String>) -> Result<Vec<String>, RagError> {
        if matches!(self.strategy, CompressionStrategy::Passthrough) {
            return Ok(chunks);
        }

        let total = chunks.len();
        let chars_before: usize = chunks.iter().map(|c| c.chars().count()).sum();
        let compressed: Vec<String> = stream::iter(chunks)
            .map(|chunk| self.compress_one(chunk))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let chars_after: usize = compressed.iter().map(|c| c.chars().count()).sum();
        info!(
            "Compressed {} chunks in {} mode: {} -> {} chars",
            total,
            self.mode_name(),
            chars_before,
            chars_after
        );
        Ok(compressed)
    }

    async fn compress_one(&self, chunk: String) -> Result<String, RagError> {
        match &self.strategy {
            CompressionStrategy::Passthrough => Ok(chunk),
            CompressionStrategy::Remote { client, context } => {
                Ok(client.compress(&chunk, context).await?)
            }
            CompressionStrategy::Llm(llm) => {
                let prompt = format!("{LLM_COMPRESS_INSTRUCTION}\n\nTEXT:\n{chunk}");
                Ok(llm.generate(&prompt, 0.0).await?)
            }
        }
    }
}
