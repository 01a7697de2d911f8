use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use scholar_llm::HttpTransport;

use super::traits::{Embedder, EmbeddingError};

pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OPENAI_EMBEDDING_URL: &str = "https://api.openai.com";

/// OpenAI-compatible `/v1/embeddings` backend.
pub struct OpenAiEmbedder {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        dimensions: usize,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_EMBEDDING_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            transport,
            api_key,
            model,
            base_url,
            dimensions,
        }
    }

    /// Only the text-embedding-3 family accepts a requested output size.
    fn requested_dimensions(&self) -> Option<usize> {
        self.model
            .starts_with("text-embedding-3")
            .then_some(self.dimensions)
    }

    fn request_body(&self, texts: &[&str]) -> serde_json::Value {
        let mut body = json!({ "model": self.model, "input": texts });
        if let Some(dimensions) = self.requested_dimensions() {
            body["dimensions"] = json!(dimensions);
        }
        body
    }
}

#[derive(Deserialize)]
struct EmbeddingList {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/v1/embeddings", self.base_url);
        let headers = [(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )];
        let reply = self
            .transport
            .post_json(&url, &headers, &self.request_body(texts))
            .await?;
        if !reply.is_success() {
            return Err(EmbeddingError::Api(format!("{}: {}", reply.status, reply.body)));
        }

        let mut list: EmbeddingList = serde_json::from_str(&reply.body)
            .map_err(|e| EmbeddingError::Api(format!("unreadable embeddings reply: {e}")))?;
        // Replies may arrive out of input order.
        list.data.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f32>> = list.data.into_iter().map(|item| item.embedding).collect();

        check_shape(&vectors, texts.len(), self.dimensions)?;
        tracing::debug!("{} embedded {} texts", self.model, vectors.len());
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// One vector per text, each of the configured size.
pub(crate) fn check_shape(
    vectors: &[Vec<f32>],
    expected_count: usize,
    dimensions: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected_count {
        return Err(EmbeddingError::CountMismatch {
            expected: expected_count,
            actual: vectors.len(),
        });
    }
    match vectors.iter().find(|v| v.len() != dimensions) {
        Some(bad) => Err(EmbeddingError::DimensionMismatch {
            expected: dimensions,
            actual: bad.len(),
        }),
        None => Ok(()),
    }
}
