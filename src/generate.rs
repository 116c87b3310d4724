use anyhow::{bail, Result};

use ragkit_core::chat::generate;
use ragkit_core::structured::structured_json;

use crate::config::Config;
use crate::openai::OpenAIProvider;

/// `ragkit generate`: single-turn completion, printed as plain text.
pub fn run_generate(config: &Config, prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        bail!("generate: --prompt is required");
    }

    let provider = OpenAIProvider::new(&config.openai)?;
    println!("{}", generate(&provider, prompt)?);
    Ok(())
}

/// `ragkit structured`: validated `{title, summary, keywords}` as JSON.
pub fn run_structured(config: &Config, prompt: &str, max_retries: usize) -> Result<()> {
    if prompt.trim().is_empty() {
        bail!("structured: --prompt is required");
    }

    let provider = OpenAIProvider::new(&config.openai)?;
    let output = structured_json(&provider, prompt, max_retries)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
