//! Chunk configuration and output types.

// ── Configuration ───────────────────────────────────────────────────────────

/// Separators in priority order: paragraph break, line break, sentence end,
/// word, and the empty string for character-level splitting.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Configuration for the chunking engine. Sizes are measured in characters.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 1200).
    pub chunk_size: usize,
    /// Characters of trailing context carried into the next chunk (default: 200).
    pub chunk_overlap: usize,
    /// Separators tried in order. Pieces still too long once they run out
    /// are split by character.
    pub separators: Vec<String>,
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }

    /// Size and overlap clamped to a workable pair (`size >= 1`, `overlap < size`).
    pub(crate) fn effective_bounds(&self) -> (usize, usize) {
        let size = self.chunk_size.max(1);
        (size, self.chunk_overlap.min(size - 1))
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1200,
            chunk_overlap: 200,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// A chunk of text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based index within the document.
    pub index: usize,
    /// The chunk text content, trimmed of surrounding whitespace.
    pub content: String,
    /// Byte offset of `content` in the original text.
    pub char_offset: usize,
}
