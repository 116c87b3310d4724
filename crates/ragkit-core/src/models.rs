//! Data types that flow through the indexing and retrieval pipeline.

use serde::{Deserialize, Serialize};

/// A slice of normalized document text, not yet embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// File name of the document the chunk came from.
    pub source: String,
    pub text: String,
}

/// An indexed chunk with its embedding. The unit persisted in a store file.
///
/// `id` is assigned sequentially from 0 when the index is built and is only
/// unique within one store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub source: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A search hit. Produced fresh for every query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    pub id: u64,
    pub source: String,
    pub text: String,
    /// Cosine similarity to the query, in `[-1.0, 1.0]`.
    pub score: f32,
}

impl ScoredEntry {
    /// The inline citation tag for this hit, e.g. `[guide.md:4]`.
    pub fn citation_tag(&self) -> String {
        format!("[{}:{}]", self.source, self.id)
    }
}

/// The fixed schema returned by the structured-output mode.
///
/// Unknown fields are rejected. `keywords` may be empty or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredOutput {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A generated answer and the citation tags it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub text: String,
    /// Deduplicated `source:id` strings in lexicographic order.
    pub citations: Vec<String>,
}
