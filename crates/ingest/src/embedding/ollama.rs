use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use scholar_llm::HttpTransport;

use super::openai::check_shape;
use super::traits::{Embedder, EmbeddingError};

pub const DEFAULT_OLLAMA_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Local Ollama server via `/api/embed`. Ollama cannot shrink vectors, so
/// `dimensions` must match the model's native size.
pub struct OllamaEmbedder {
    transport: Arc<dyn HttpTransport>,
    url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(
        url: &str,
        model: String,
        dimensions: usize,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            url: format!("{}/api/embed", url.trim().trim_end_matches('/')),
            model,
            dimensions,
        }
    }
}

#[derive(Deserialize)]
struct EmbedReply {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = json!({ "model": self.model, "input": texts });
        let reply = self.transport.post_json(&self.url, &[], &body).await?;
        if !reply.is_success() {
            return Err(EmbeddingError::Api(format!(
                "Ollama {} ({}): {}",
                reply.status, self.model, reply.body
            )));
        }

        let parsed: EmbedReply = serde_json::from_str(&reply.body)
            .map_err(|e| EmbeddingError::Api(format!("unreadable Ollama reply: {e}")))?;
        check_shape(&parsed.embeddings, texts.len(), self.dimensions).map_err(|err| {
            if let EmbeddingError::DimensionMismatch { actual, .. } = &err {
                tracing::warn!(
                    "{} produces {actual}-dimensional vectors; set EMBEDDING_DIMENSIONS={actual}",
                    self.model
                );
            }
            err
        })?;
        Ok(parsed.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
