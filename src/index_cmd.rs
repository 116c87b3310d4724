use anyhow::{bail, Result};
use std::path::Path;

use ragkit_core::chunk::chunk_document;
use ragkit_core::embedding::EmbeddingProvider;
use ragkit_core::index::embed_chunks;
use ragkit_core::models::{Chunk, Entry};
use ragkit_core::store::save_store;

use crate::config::Config;
use crate::connector_fs::discover_documents;
use crate::openai::OpenAIProvider;

/// Overrides for the `[chunking]` and `[index]` config values.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub chunk_size: Option<i64>,
    pub overlap: Option<i64>,
    pub batch_size: Option<usize>,
}

/// Build a store at `out` from every document under `docs_dir`.
pub fn run_index(config: &Config, docs_dir: &Path, out: &Path, opts: &IndexOptions) -> Result<()> {
    let provider = OpenAIProvider::new(&config.openai)?;

    let entries = build_index(&provider, config, docs_dir, opts)?;
    save_store(out, &entries)?;

    println!("Indexed {} chunks -> {}", entries.len(), out.display());
    Ok(())
}

/// Discover, chunk, and embed; returns the entries without saving them.
pub fn build_index(
    provider: &dyn EmbeddingProvider,
    config: &Config,
    docs_dir: &Path,
    opts: &IndexOptions,
) -> Result<Vec<Entry>> {
    let chunk_size = opts
        .chunk_size
        .unwrap_or(config.chunking.chunk_size as i64);
    let overlap = opts.overlap.unwrap_or(config.chunking.overlap as i64);
    let batch_size = opts.batch_size.unwrap_or(config.index.batch_size);

    let chunks = collect_chunks(docs_dir, chunk_size, overlap)?;
    if chunks.is_empty() {
        bail!("No text files found to index.");
    }

    Ok(embed_chunks(provider, &chunks, batch_size)?)
}

/// Chunk every discovered document, in discovery order.
pub fn collect_chunks(docs_dir: &Path, chunk_size: i64, overlap: i64) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    for doc in discover_documents(docs_dir)? {
        let text = doc.read_text()?;
        let doc_chunks = chunk_document(&doc.source, &text, chunk_size, overlap);
        tracing::debug!(file = %doc.relative_path, chunks = doc_chunks.len(), "chunked document");
        chunks.extend(doc_chunks);
    }
    Ok(chunks)
}
