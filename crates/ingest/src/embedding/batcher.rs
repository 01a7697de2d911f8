use super::traits::{Embedder, EmbeddingError};

/// Embed `texts` in consecutive batches of at most `batch_size`, preserving
/// input order. Every batch is checked for one vector per text and for the
/// embedder's dimensionality.
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let batch_size = batch_size.max(1);
    let expected_dims = embedder.dimensions();
    let mut vectors = Vec::with_capacity(texts.len());

    for (batch_idx, batch) in texts.chunks(batch_size).enumerate() {
        let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
        let embeddings = embedder.embed_batch(&refs).await?;

        if embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: embeddings.len(),
            });
        }
        if let Some(bad) = embeddings.iter().find(|v| v.len() != expected_dims) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: expected_dims,
                actual: bad.len(),
            });
        }

        tracing::debug!(
            "Embedded batch {} ({} texts, {} done of {})",
            batch_idx + 1,
            batch.len(),
            vectors.len() + batch.len(),
            texts.len()
        );
        vectors.extend(embeddings);
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEmbedder {
        call_count: AtomicUsize,
        dims: usize,
        /// Vectors returned per call are one short when set.
        drop_one: bool,
    }

    impl FakeEmbedder {
        fn new(dims: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                dims,
                drop_one: false,
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let mut out: Vec<Vec<f32>> = texts
                .iter()
                .map(|t| vec![t.len() as f32; self.dims])
                .collect();
            if self.drop_one {
                out.pop();
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            self.dims
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| "t".repeat(i + 1)).collect()
    }

    #[tokio::test]
    async fn splits_into_batches_in_order() {
        let embedder = FakeEmbedder::new(4);
        let vectors = embed_in_batches(&embedder, &texts(7), 3).await.unwrap();

        assert_eq!(vectors.len(), 7);
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 3);
        for (i, v) in vectors.iter().enumerate() {
            assert_eq!(v[0], (i + 1) as f32);
        }
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let embedder = FakeEmbedder::new(4);
        let vectors = embed_in_batches(&embedder, &[], 64).await.unwrap();
        assert!(vectors.is_empty());
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn short_reply_is_rejected() {
        let embedder = FakeEmbedder {
            drop_one: true,
            ..FakeEmbedder::new(4)
        };
        let err = embed_in_batches(&embedder, &texts(2), 8).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch { expected: 2, actual: 1 }
        ));
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped() {
        let embedder = FakeEmbedder::new(2);
        let vectors = embed_in_batches(&embedder, &texts(2), 0).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 2);
    }
}
