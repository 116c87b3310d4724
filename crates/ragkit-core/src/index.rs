//! Turn chunks into store entries by embedding them in batches.
//!
//! Batches are sent one at a time, in order, and ids are assigned in chunk
//! order starting at 0. A failed batch aborts the whole build: a store is
//! only ever written from a complete entry list.

use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::models::{Chunk, Entry};

/// Texts per embedding request when the caller passes 0.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Embed `chunks` and return them as entries with sequential ids.
///
/// # Errors
///
/// Any provider error, or [`Error::UnexpectedResponse`] when a batch comes
/// back with a different number of vectors than it sent.
pub fn embed_chunks(
    provider: &dyn EmbeddingProvider,
    chunks: &[Chunk],
    batch_size: usize,
) -> Result<Vec<Entry>> {
    let batch_size = if batch_size == 0 {
        DEFAULT_BATCH_SIZE
    } else {
        batch_size
    };

    let mut entries = Vec::with_capacity(chunks.len());
    let batches = chunks.len().div_ceil(batch_size);

    for (n, batch) in chunks.chunks(batch_size).enumerate() {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = provider.embed(&texts)?;

        if vectors.len() != batch.len() {
            return Err(Error::UnexpectedResponse(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                vectors.len()
            )));
        }

        for (chunk, embedding) in batch.iter().zip(vectors) {
            entries.push(Entry {
                id: entries.len() as u64,
                source: chunk.source.clone(),
                text: chunk.text.clone(),
                embedding,
            });
        }

        tracing::debug!(batch = n + 1, batches, size = batch.len(), "embedded batch");
    }

    tracing::info!(
        entries = entries.len(),
        model = provider.model_name(),
        "embedding complete"
    );
    Ok(entries)
}
