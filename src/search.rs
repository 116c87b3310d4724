use anyhow::{bail, Result};
use std::path::Path;

use ragkit_core::answer::answer_with_citations;
use ragkit_core::chat::ChatProvider;
use ragkit_core::embedding::{embed_query, EmbeddingProvider};
use ragkit_core::models::{Answer, ScoredEntry};
use ragkit_core::search::search;
use ragkit_core::store::load_store;

use crate::config::Config;
use crate::openai::OpenAIProvider;

/// `ragkit search`: print the top-k entries for `query` as JSON.
pub fn run_search(config: &Config, query: &str, store: &Path, top_k: Option<i64>) -> Result<()> {
    if query.trim().is_empty() {
        bail!("search: --query is required");
    }

    let provider = OpenAIProvider::new(&config.openai)?;
    let top_k = top_k.unwrap_or(config.retrieval.top_k as i64);
    let results = retrieve(&provider, store, query, top_k)?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// `ragkit rag`: answer `query` from the store and list the citations used.
pub fn run_rag(config: &Config, query: &str, store: &Path, top_k: Option<i64>) -> Result<()> {
    if query.trim().is_empty() {
        bail!("rag: --query is required");
    }

    let provider = OpenAIProvider::new(&config.openai)?;
    let top_k = top_k.unwrap_or(config.retrieval.top_k as i64);
    let answer = answer_from_store(&provider, &provider, store, query, top_k)?;

    println!("{}", answer.text);
    if !answer.citations.is_empty() {
        println!("\nCitations:");
        println!("{}", serde_json::to_string_pretty(&answer.citations)?);
    }
    Ok(())
}

/// Load the store, embed the query, and rank the entries.
///
/// The store is loaded first so a missing file fails before any provider
/// call is made.
pub fn retrieve(
    embedder: &dyn EmbeddingProvider,
    store: &Path,
    query: &str,
    top_k: i64,
) -> Result<Vec<ScoredEntry>> {
    let entries = load_store(store)?;
    let query_embedding = embed_query(embedder, query)?;
    let results = search(&entries, &query_embedding, top_k);
    tracing::info!(entries = entries.len(), results = results.len(), "search complete");
    Ok(results)
}

/// Retrieve the best chunks for `query` and compose a cited answer.
pub fn answer_from_store(
    embedder: &dyn EmbeddingProvider,
    chat: &dyn ChatProvider,
    store: &Path,
    query: &str,
    top_k: i64,
) -> Result<Answer> {
    let results = retrieve(embedder, store, query, top_k)?;
    Ok(answer_with_citations(chat, query, &results)?)
}
