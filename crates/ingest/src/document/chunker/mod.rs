//! Recursive character chunking engine.
//!
//! Splits extracted document text into overlapping, length-bounded chunks
//! suitable for embedding. Separators are tried in priority order (paragraph,
//! line, sentence, word, character) so chunks break along the most semantic
//! boundary that still fits the size budget.

mod helpers;
mod recursive;
mod types;

pub use recursive::chunk_text;
pub use types::{Chunk, ChunkConfig, DEFAULT_SEPARATORS};
