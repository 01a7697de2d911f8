pub mod compressor;
pub mod error;
pub mod index;
pub mod retriever;
pub mod summarize;

pub use compressor::Compressor;
pub use error::RagError;
pub use index::{SearchHit, VectorIndex};
pub use retriever::Retriever;
pub use summarize::Summarizer;
