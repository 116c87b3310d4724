//! Context-grounded answers with inline citations.
//!
//! Retrieved chunks are placed in the prompt tagged as `[source:id]`, the
//! model is asked to cite those tags inline, and the tags it actually used
//! are parsed back out of the reply.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::chat::{generate, ChatProvider};
use crate::error::Result;
use crate::models::{Answer, ScoredEntry};

const ANSWER_INSTRUCTIONS: &str = "Answer the question using only the context below. \
Cite sources in-line as [source:id]. If the answer is not in the context, say you do not know.";

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\[\]]+?:\d+)\]").expect("citation pattern is valid"))
}

/// Build the grounded prompt for `query` over `chunks`.
pub fn build_prompt(query: &str, chunks: &[ScoredEntry]) -> String {
    let context = chunks
        .iter()
        .map(|chunk| format!("{} {}", chunk.citation_tag(), chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\nContext:\n{}\n\nQuestion: {}\nAnswer:",
        ANSWER_INSTRUCTIONS, context, query
    )
}

/// Collect every `[X:N]` tag in `answer` as `X:N`.
///
/// `X` may not contain brackets and `N` must be a decimal integer. The
/// result is deduplicated and sorted lexicographically, not by position.
pub fn extract_citations(answer: &str) -> Vec<String> {
    citation_pattern()
        .captures_iter(answer)
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Answer `query` from `chunks` with one generation call.
///
/// Provider failures propagate unchanged; there is no retry here.
pub fn answer_with_citations(
    provider: &dyn ChatProvider,
    query: &str,
    chunks: &[ScoredEntry],
) -> Result<Answer> {
    let prompt = build_prompt(query, chunks);
    let text = generate(provider, &prompt)?;
    let citations = extract_citations(&text);
    tracing::debug!(chunks = chunks.len(), citations = citations.len(), "answer composed");
    Ok(Answer { text, citations })
}
