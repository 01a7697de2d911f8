use scholar_ingest::document::ExtractionError;
use scholar_ingest::embedding::EmbeddingError;
use scholar_llm::LlmError;
use thiserror::Error;

/// Failure of any pipeline stage. The pipeline is all-or-nothing.
#[derive(Debug, Error)]
pub enum RagError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
