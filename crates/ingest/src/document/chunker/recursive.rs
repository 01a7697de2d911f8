//! Recursive splitting strategy.

use super::helpers::{char_len, merge_splits, pick_separator, split_keeping_separator};
use super::types::{Chunk, ChunkConfig};

static CHARACTER_FALLBACK: [String; 1] = [String::new()];

/// Split `text` into overlapping chunks of at most `config.chunk_size`
/// characters. Empty or whitespace-only input yields no chunks.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let (size, overlap) = config.effective_bounds();
    let pieces = split_recursive(text, &config.separators, size, overlap);
    locate_chunks(text, pieces, overlap)
}

fn split_recursive(text: &str, separators: &[String], size: usize, overlap: usize) -> Vec<String> {
    let (separator, rest) = pick_separator(text, separators);
    let splits = split_keeping_separator(text, separator);

    let mut finals = Vec::new();
    let mut fitting: Vec<String> = Vec::new();

    for piece in splits {
        if char_len(&piece) < size {
            fitting.push(piece);
            continue;
        }
        if !fitting.is_empty() {
            finals.extend(merge_splits(&fitting, size, overlap));
            fitting.clear();
        }
        if !rest.is_empty() {
            finals.extend(split_recursive(&piece, rest, size, overlap));
        } else if !separator.is_empty() && char_len(piece.trim()) > size {
            // Caller-supplied separators ran out before the piece fit.
            finals.extend(split_recursive(&piece, &CHARACTER_FALLBACK, size, overlap));
        } else {
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                finals.push(trimmed.to_string());
            }
        }
    }
    if !fitting.is_empty() {
        finals.extend(merge_splits(&fitting, size, overlap));
    }
    finals
}

/// Attach indices and byte offsets. Chunks are produced in source order and a
/// chunk shares at most `overlap` characters with its predecessor, so each one
/// is searched for no earlier than `overlap` characters before the previous end.
fn locate_chunks(text: &str, pieces: Vec<String>, overlap: usize) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(pieces.len());
    let mut last_offset = 0usize;
    let mut search_from = 0usize;

    for (index, content) in pieces.into_iter().enumerate() {
        let found = text[search_from..]
            .find(content.as_str())
            .map(|p| p + search_from)
            .or_else(|| text[last_offset..].find(content.as_str()).map(|p| p + last_offset));

        let offset = match found {
            Some(offset) => {
                let next_start = offset + text[offset..].chars().next().map_or(0, char::len_utf8);
                let end = offset + content.len();
                search_from = next_start.max(back_chars(text, end, overlap));
                offset
            }
            None => last_offset,
        };
        last_offset = offset;
        chunks.push(Chunk {
            index,
            content,
            char_offset: offset,
        });
    }
    chunks
}

/// Byte index `n` characters before `end` (clamped to 0).
fn back_chars(text: &str, end: usize, n: usize) -> usize {
    if n == 0 {
        return end;
    }
    text[..end]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(i, _)| i)
}
