//! Text splitting and merging utilities used by the recursive splitter.

use std::collections::VecDeque;

/// Length in characters (not bytes).
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Pick the first separator that occurs in `text`. The empty separator
/// always matches. Returns the separator and the lower-priority ones after it.
pub(crate) fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() || text.contains(sep.as_str()) {
            return (sep.as_str(), &separators[i + 1..]);
        }
    }
    ("", &[])
}

/// Split `text` on `separator`, keeping the separator at the end of the
/// preceding piece so concatenating the pieces gives back `text`.
pub(crate) fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }
    text.split_inclusive(separator)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Greedily pack consecutive pieces (each shorter than `chunk_size`) into
/// chunks of at most `chunk_size` characters. After a chunk is emitted,
/// pieces are dropped from the front until at most `chunk_overlap`
/// characters remain, so the tail carries over into the next chunk.
pub(crate) fn merge_splits(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut docs = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for piece in pieces {
        let len = char_len(piece);
        if total + len > chunk_size && !current.is_empty() {
            push_joined(&current, &mut docs);
            while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                match current.pop_front() {
                    Some(front) => total -= char_len(front),
                    None => break,
                }
            }
        }
        current.push_back(piece);
        total += len;
    }
    push_joined(&current, &mut docs);
    docs
}

fn push_joined(current: &VecDeque<&str>, docs: &mut Vec<String>) {
    let joined: String = current.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        docs.push(trimmed.to_string());
    }
}
