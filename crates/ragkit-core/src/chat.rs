//! Chat-completion provider trait and message types.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sampling temperature for free-form generation.
pub const GENERATE_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation, serialized as `{"role": ..., "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for text-generation providers.
pub trait ChatProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-4o-mini"`).
    fn model_name(&self) -> &str;

    /// Send an ordered message list and return the first choice's content.
    ///
    /// Blocks until the provider answers. A response without choices is an
    /// [`Error::UnexpectedResponse`](crate::Error::UnexpectedResponse).
    fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

/// Single-turn generation: one user message, trimmed reply.
pub fn generate(provider: &dyn ChatProvider, prompt: &str) -> Result<String> {
    let reply = provider.chat(&[ChatMessage::user(prompt)], GENERATE_TEMPERATURE)?;
    Ok(reply.trim().to_string())
}
