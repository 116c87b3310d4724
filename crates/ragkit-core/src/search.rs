//! Brute-force top-k retrieval over an in-memory entry list.
//!
//! Every entry is scored against the query with
//! [`cosine_similarity`](crate::embedding::cosine_similarity), then the list
//! is sorted by score (descending) and truncated. The sort is stable, so
//! entries with equal scores keep their store order and results are
//! deterministic.

use crate::embedding::cosine_similarity;
use crate::models::{Entry, ScoredEntry};

/// Result count used when the caller passes a non-positive `top_k`.
pub const DEFAULT_TOP_K: usize = 5;

/// Return the `top_k` entries most similar to `query_embedding`.
///
/// - `top_k <= 0` falls back to [`DEFAULT_TOP_K`].
/// - `top_k` larger than the entry count returns every entry.
/// - Entries whose embedding is empty, zero, or of another dimension score
///   `0.0` and still take part in the ranking.
pub fn search(entries: &[Entry], query_embedding: &[f32], top_k: i64) -> Vec<ScoredEntry> {
    let limit = match usize::try_from(top_k) {
        Ok(0) | Err(_) => DEFAULT_TOP_K,
        Ok(n) => n,
    };

    let mut scored: Vec<ScoredEntry> = entries
        .iter()
        .map(|entry| ScoredEntry {
            id: entry.id,
            source: entry.source.clone(),
            text: entry.text.clone(),
            score: cosine_similarity(query_embedding, &entry.embedding),
        })
        .collect();

    // `sort_by` is stable: ties stay in store order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit.min(scored.len()));
    scored
}
