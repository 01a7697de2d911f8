use crate::error::RagError;
use crate::index::VectorIndex;

pub const DEFAULT_TOP_K: usize = 6;

/// Top-K projection over [`VectorIndex::search`].
#[derive(Debug, Clone, Copy)]
pub struct Retriever {
    k: usize,
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl Retriever {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// At most `k` chunk texts, best first.
    pub async fn retrieve(&self, index: &VectorIndex, query: &str) -> Result<Vec<String>, RagError> {
        Ok(index
            .search(query, self.k)
            .await?
            .into_iter()
            .map(|hit| hit.text)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_ingest::embedding::HashEmbedder;
    use std::sync::Arc;

    async fn index_of(n: usize) -> VectorIndex {
        let chunks = (0..n).map(|i| format!("chunk number {i} about retrieval")).collect();
        VectorIndex::build(chunks, Arc::new(HashEmbedder::new(64)), 64)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn never_returns_more_than_k_or_index_size() {
        let index = index_of(10).await;
        assert_eq!(Retriever::default().retrieve(&index, "retrieval").await.unwrap().len(), 6);
        assert_eq!(Retriever::new(3).retrieve(&index, "retrieval").await.unwrap().len(), 3);

        let small = index_of(2).await;
        assert_eq!(Retriever::new(6).retrieve(&small, "retrieval").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn best_match_first() {
        let chunks = vec![
            "the weather was mild".to_string(),
            "attention heads in transformer models".to_string(),
        ];
        let index = VectorIndex::build(chunks, Arc::new(HashEmbedder::new(256)), 64)
            .await
            .unwrap();
        let texts = Retriever::new(1).retrieve(&index, "transformer attention").await.unwrap();
        assert_eq!(texts, vec!["attention heads in transformer models".to_string()]);
    }
}
