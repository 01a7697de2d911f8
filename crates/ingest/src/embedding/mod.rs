pub mod batcher;
pub mod hash;
pub mod ollama;
pub mod openai;
pub mod traits;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use scholar_core::config::EmbeddingConfig;
use scholar_llm::HttpTransport;

pub use batcher::embed_in_batches;
pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the embedder selected by `EMBEDDING_PROVIDER`. Remote backends send
/// through `transport`, which carries the fixed request timeout.
pub fn create_embedder(
    config: &EmbeddingConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(config.dimensions))),
        "openai" => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                EmbeddingError::NotConfigured(
                    "EMBEDDING_PROVIDER=openai but neither EMBEDDING_API_KEY nor OPENAI_API_KEY is set."
                        .to_string(),
                )
            })?;
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_OPENAI_EMBEDDING_MODEL.to_string());
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                model,
                config.base_url.clone(),
                config.dimensions,
                transport,
            )))
        }
        "ollama" => {
            let url = config.base_url.as_deref().unwrap_or(&config.ollama_url);
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| ollama::DEFAULT_OLLAMA_EMBEDDING_MODEL.to_string());
            Ok(Arc::new(OllamaEmbedder::new(url, model, config.dimensions, transport)))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "Unknown EMBEDDING_PROVIDER '{other}'. Use one of: hash, openai, ollama."
        ))),
    }
}
