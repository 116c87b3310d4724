//! # ragkit core
//!
//! Provider-agnostic logic for ragkit: text chunking, the flat JSON vector
//! store, cosine top-k search, the structured-output validator, and the
//! citation-extracting answer composer.
//!
//! This crate performs no network I/O. Embedding and generation are reached
//! through the [`embedding::EmbeddingProvider`] and [`chat::ChatProvider`]
//! traits, which the `ragkit` application implements over HTTP.

pub mod answer;
pub mod chat;
pub mod chunk;
pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod search;
pub mod store;
pub mod structured;

pub use error::{Error, Result, ValidationError};
