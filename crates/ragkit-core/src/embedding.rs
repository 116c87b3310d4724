//! Embedding provider trait and vector similarity.
//!
//! Defines the [`EmbeddingProvider`] trait that embedding backends
//! implement, plus the cosine similarity used by [`search`](crate::search).
//!
//! The HTTP implementation lives in the `ragkit` application crate.

use crate::error::{Error, Result};

/// Trait for embedding providers.
///
/// Calls block until the provider answers or fails. Implementations must
/// return exactly one vector per input text, in input order.
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;

    /// Embed a batch of texts.
    ///
    /// # Errors
    ///
    /// [`Error::Provider`] for a non-success status, [`Error::Transport`]
    /// when the request cannot be completed, [`Error::UnexpectedResponse`]
    /// for an undecodable body.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embed a single query text.
///
/// Convenience wrapper around [`EmbeddingProvider::embed`] for search
/// queries.
pub fn embed_query(provider: &dyn EmbeddingProvider, text: &str) -> Result<Vec<f32>> {
    provider
        .embed(&[text.to_string()])?
        .into_iter()
        .next()
        .ok_or_else(|| Error::UnexpectedResponse("failed to embed query".to_string()))
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Degenerate input scores `0.0` instead of failing: empty vectors, vectors
/// of different lengths, vectors with zero magnitude, and components whose
/// products are not finite.
///
/// Sums are accumulated in `f64` so that large `f32` components do not
/// overflow.
///
/// # Formula
///
/// ```text
///            a · b
/// cos(θ) = ─────────
///          ‖a‖ × ‖b‖
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32;
    // Also folds -0.0 into 0.0 so equal scores compare equal when ranked.
    if !score.is_finite() || score == 0.0 {
        return 0.0;
    }
    score.clamp(-1.0, 1.0)
}
