//! Process-wide configuration snapshot.
//!
//! A [`Config`] is built once at startup and passed by reference to every
//! command. Values are layered, later sources winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file (`--config`),
//! 3. environment variables (`OPENAI_API_KEY`, `OPENAI_MODEL`,
//!    `OPENAI_EMBED_MODEL`, `OPENAI_BASE_URL`, `REQUEST_TIMEOUT_SECONDS`).
//!
//! The API key is only ever read from the environment.
//!
//! ```toml
//! [openai]
//! model = "gpt-4o-mini"
//! embed_model = "text-embedding-3-small"
//! timeout_secs = 30
//!
//! [chunking]
//! chunk_size = 800
//! overlap = 150
//!
//! [index]
//! batch_size = 32
//!
//! [retrieval]
//! top_k = 5
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use ragkit_core::chunk::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use ragkit_core::index::DEFAULT_BATCH_SIZE;
use ragkit_core::search::DEFAULT_TOP_K;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub openai: OpenAIConfig,
    pub chunking: ChunkingConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAIConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub model: String,
    pub embed_model: String,
    pub base_url: String,
    pub timeout_secs: f64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 30.0,
        }
    }
}

impl OpenAIConfig {
    /// The request timeout as a [`Duration`].
    ///
    /// Fails for zero, negative, non-finite, or out-of-range values.
    pub fn timeout(&self) -> ragkit_core::Result<Duration> {
        match Duration::try_from_secs_f64(self.timeout_secs) {
            Ok(timeout) if !timeout.is_zero() => Ok(timeout),
            _ => Err(ragkit_core::Error::Config(format!(
                "openai.timeout_secs must be a positive number of seconds, got {}",
                self.timeout_secs
            ))),
        }
    }

    /// The API key, or a configuration error for commands that need it.
    pub fn require_api_key(&self) -> ragkit_core::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ragkit_core::Error::Config("OPENAI_API_KEY is required for this command.".to_string())
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IndexConfig {
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Load configuration from `path` (if given) and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading variables through `env` instead of the
/// process environment. Empty values count as unset.
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).with_context(|| "Failed to parse config file")?
        }
        None => Config::default(),
    };

    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    config.openai.api_key = env("OPENAI_API_KEY");
    if let Some(model) = env("OPENAI_MODEL") {
        config.openai.model = model;
    }
    if let Some(model) = env("OPENAI_EMBED_MODEL") {
        config.openai.embed_model = model;
    }
    if let Some(url) = env("OPENAI_BASE_URL") {
        config.openai.base_url = url;
    }
    if let Some(raw) = env("REQUEST_TIMEOUT_SECONDS") {
        config.openai.timeout_secs = raw
            .trim()
            .parse()
            .with_context(|| "REQUEST_TIMEOUT_SECONDS must be a number.")?;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    config.openai.timeout()?;

    if config.chunking.chunk_size == 0 {
        bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.overlap >= config.chunking.chunk_size {
        bail!("chunking.overlap must be < chunking.chunk_size");
    }

    if config.index.batch_size == 0 {
        bail!("index.batch_size must be > 0");
    }

    if config.retrieval.top_k == 0 {
        bail!("retrieval.top_k must be > 0");
    }

    Ok(())
}
