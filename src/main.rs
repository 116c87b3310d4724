//! # ragkit CLI
//!
//! ## Usage
//!
//! ```bash
//! ragkit [--config ./ragkit.toml] [--verbose] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragkit generate --prompt "<text>"` | Single-turn text generation |
//! | `ragkit structured --prompt "<text>"` | Schema-validated JSON `{title, summary, keywords}` |
//! | `ragkit index` | Chunk and embed a docs folder into a vector store |
//! | `ragkit search --query "<text>"` | Top-k similarity search over a vector store |
//! | `ragkit rag --query "<text>"` | Answer from retrieved chunks with citations |
//!
//! ## Examples
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! ragkit index --docs-dir ./sample_docs --out ./data/vectorstore.json
//! ragkit search --query "how do I deploy?" --top-k 3
//! ragkit rag --query "how do I deploy?"
//! ```
//!
//! Logs go to stderr and are filtered by `RUST_LOG` (default `warn`).
//! Command output goes to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ragkit::config;
use ragkit::generate;
use ragkit::index_cmd::{self, IndexOptions};
use ragkit::search;
use ragkit_core::structured::DEFAULT_MAX_RETRIES;

const DEFAULT_DOCS_DIR: &str = "./sample_docs";
const DEFAULT_STORE: &str = "./data/vectorstore.json";

/// ragkit: chunk, embed, search, and answer with citations.
///
/// Provider settings come from the environment (`OPENAI_API_KEY`,
/// `OPENAI_MODEL`, `OPENAI_EMBED_MODEL`, `OPENAI_BASE_URL`,
/// `REQUEST_TIMEOUT_SECONDS`), optionally layered over a TOML file.
#[derive(Parser)]
#[command(
    name = "ragkit",
    about = "ragkit: a minimal retrieval-augmented generation toolkit",
    version
)]
struct Cli {
    /// Path to an optional TOML configuration file.
    ///
    /// Environment variables override values from this file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging for ragkit on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate text from a single prompt.
    Generate {
        /// Prompt text.
        #[arg(long)]
        prompt: String,
    },

    /// Return schema-validated JSON with keys title, summary, keywords.
    ///
    /// Invalid replies are sent back to the model with the validation
    /// error, up to `--max-retries` times.
    Structured {
        /// Prompt text.
        #[arg(long)]
        prompt: String,

        /// Corrective follow-ups allowed after the first attempt.
        #[arg(long, alias = "max_retries", default_value_t = DEFAULT_MAX_RETRIES)]
        max_retries: usize,
    },

    /// Index a folder of .txt/.md/.markdown files into a vector store.
    ///
    /// The store file is rewritten whole on every run.
    Index {
        /// Folder to scan recursively.
        #[arg(long, alias = "docs_dir", default_value = DEFAULT_DOCS_DIR)]
        docs_dir: PathBuf,

        /// Vector store file to write.
        #[arg(long, alias = "store", default_value = DEFAULT_STORE)]
        out: PathBuf,

        /// Characters per chunk (overrides `[chunking].chunk_size`).
        #[arg(long, alias = "chunk_size", allow_negative_numbers = true)]
        chunk_size: Option<i64>,

        /// Characters shared by consecutive chunks (overrides `[chunking].overlap`).
        #[arg(long, allow_negative_numbers = true)]
        overlap: Option<i64>,

        /// Texts per embedding request (overrides `[index].batch_size`).
        #[arg(long, alias = "batch_size")]
        batch_size: Option<usize>,
    },

    /// Search a vector store and print scored chunks as JSON.
    Search {
        /// Search query.
        #[arg(long)]
        query: String,

        /// Vector store file to read.
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Number of results (overrides `[retrieval].top_k`).
        #[arg(long, alias = "top_k", allow_negative_numbers = true)]
        top_k: Option<i64>,
    },

    /// Answer a question from the vector store with inline citations.
    Rag {
        /// Question to answer.
        #[arg(long)]
        query: String,

        /// Vector store file to read.
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Number of chunks given to the model (overrides `[retrieval].top_k`).
        #[arg(long, alias = "top_k", allow_negative_numbers = true)]
        top_k: Option<i64>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,ragkit=debug,ragkit_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // A missing .env file is fine.
    dotenv::dotenv().ok();

    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { prompt } => {
            generate::run_generate(&cfg, &prompt)?;
        }
        Commands::Structured {
            prompt,
            max_retries,
        } => {
            generate::run_structured(&cfg, &prompt, max_retries)?;
        }
        Commands::Index {
            docs_dir,
            out,
            chunk_size,
            overlap,
            batch_size,
        } => {
            let opts = IndexOptions {
                chunk_size,
                overlap,
                batch_size,
            };
            index_cmd::run_index(&cfg, &docs_dir, &out, &opts)?;
        }
        Commands::Search { query, store, top_k } => {
            search::run_search(&cfg, &query, &store, top_k)?;
        }
        Commands::Rag { query, store, top_k } => {
            search::run_rag(&cfg, &query, &store, top_k)?;
        }
    }

    Ok(())
}
