use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use scholar_ingest::embedding::{embed_in_batches, Embedder, EmbeddingError};

use crate::error::RagError;

/// A ranked chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub text: String,
    pub score: f32,
}

/// Ephemeral in-memory similarity index over one document's chunks.
pub struct VectorIndex {
    entries: Vec<(String, Vec<f32>)>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Embed `chunks` in batches and keep them in input order. Duplicates are kept.
    pub async fn build(
        chunks: Vec<String>,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
    ) -> Result<Self, RagError> {
        let vectors = embed_in_batches(embedder.as_ref(), &chunks, batch_size).await?;
        info!(
            "Indexed {} chunks ({} dimensions)",
            vectors.len(),
            embedder.dimensions()
        );
        Ok(Self {
            entries: chunks.into_iter().zip(vectors).collect(),
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `k` entries by cosine similarity to `query`, best first. Ties keep
    /// insertion order. `k == 0` or an empty index returns nothing without
    /// embedding the query.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RagError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed_batch(&[query])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch { expected: 1, actual: 0 })?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i, cosine_similarity(&query_vector, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| SearchHit {
                text: self.entries[i].0.clone(),
                score,
            })
            .collect())
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len().min(b.len());
    if dim == 0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for i in 0..dim {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
