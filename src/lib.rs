//! # ragkit
//!
//! A minimal retrieval-augmented generation toolkit on top of the OpenAI
//! API: index a folder of text and Markdown files into a flat JSON vector
//! store, search it by cosine similarity, and answer questions with inline
//! `[source:id]` citations. A structured-output mode returns schema-checked
//! JSON, asking the model to correct itself when validation fails.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │ docs dir   │──▶│ chunk+embed  │──▶│ vectorstore.json│
//! │ .txt / .md │   │  (batched)   │   │  flat JSON list │
//! └────────────┘   └──────────────┘   └────────┬────────┘
//!                                              │
//!                     query ──embed──▶ top-k cosine search
//!                                              │
//!                                              ▼
//!                                 answer + [source:id] citations
//! ```
//!
//! The provider-independent logic lives in the `ragkit-core` crate; this
//! crate adds configuration, the OpenAI client, document discovery, and the
//! command implementations behind the `ragkit` binary.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Defaults, TOML file, and environment layering |
//! | [`openai`] | Blocking OpenAI embeddings + chat client |
//! | [`connector_fs`] | Recursive document discovery |
//! | [`index_cmd`] | `ragkit index` |
//! | [`search`] | `ragkit search` and `ragkit rag` |
//! | [`generate`] | `ragkit generate` and `ragkit structured` |

pub mod config;
pub mod connector_fs;
pub mod generate;
pub mod index_cmd;
pub mod openai;
pub mod search;
