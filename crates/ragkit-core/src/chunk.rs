//! Fixed-window text chunker.
//!
//! Splits document text into overlapping windows of `chunk_size` characters.
//! Whitespace runs are collapsed to single spaces first, so chunk boundaries
//! depend only on the visible text and not on the document's line layout.
//!
//! # Algorithm
//!
//! 1. Collapse whitespace runs to one space and trim both ends.
//! 2. Return nothing for empty input.
//! 3. Default `chunk_size <= 0` to 800 and `overlap < 0` to 0.
//! 4. Emit the window `[start, min(start + chunk_size, len))`.
//! 5. Stop once a window reaches the end of the text.
//! 6. Otherwise continue from `end - overlap`.
//!
//! Lengths are counted in `char`s, never in UTF-8 bytes, so windows never
//! split a multi-byte character.
//!
//! An `overlap` that is not smaller than `chunk_size` is clamped to
//! `chunk_size - 1`, which keeps the step at one character or more.
//!
//! # Example
//!
//! ```rust
//! use ragkit_core::chunk::chunk_text;
//!
//! let chunks = chunk_text("one two   three\nfour", 8, 2);
//! assert_eq!(chunks, vec!["one two ", "o three ", "e four"]);
//! ```

use crate::models::Chunk;

/// Window length used when the caller passes a non-positive size.
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Overlap used by the indexing pipeline unless configured otherwise.
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Split `text` into overlapping windows.
///
/// The result is finite and eagerly built. For `overlap < chunk_size` and a
/// normalized length `len > chunk_size` it holds exactly
/// `ceil((len - overlap) / (chunk_size - overlap))` windows, and the last one
/// always ends at the end of the text.
pub fn chunk_text(text: &str, chunk_size: i64, overlap: i64) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let (size, overlap) = effective_window(chunk_size, overlap);
    let chars: Vec<char> = normalized.chars().collect();
    let len = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < len {
        let end = (start + size).min(len);
        chunks.push(chars[start..end].iter().collect());
        if end >= len {
            break;
        }
        start = end.saturating_sub(overlap);
    }

    chunks
}

/// Chunk one document and tag every window with its source label.
pub fn chunk_document(source: &str, text: &str, chunk_size: i64, overlap: i64) -> Vec<Chunk> {
    chunk_text(text, chunk_size, overlap)
        .into_iter()
        .map(|text| Chunk {
            source: source.to_string(),
            text,
        })
        .collect()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply defaults and clamp the overlap below the window size.
fn effective_window(chunk_size: i64, overlap: i64) -> (usize, usize) {
    let size = match usize::try_from(chunk_size) {
        Ok(0) | Err(_) => DEFAULT_CHUNK_SIZE,
        Ok(n) => n,
    };
    let overlap = usize::try_from(overlap).unwrap_or(0);
    (size, overlap.min(size - 1))
}
