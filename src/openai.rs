//! Blocking OpenAI client.
//!
//! Implements [`EmbeddingProvider`] over `POST {base_url}/embeddings` and
//! [`ChatProvider`] over `POST {base_url}/chat/completions`.
//!
//! There is no automatic retry: a non-success status becomes
//! [`Error::Provider`] carrying the status code and raw body, and a request
//! that cannot be completed (including a timeout) becomes
//! [`Error::Transport`]. The request timeout comes from
//! [`OpenAIConfig::timeout`].

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use ragkit_core::chat::{ChatMessage, ChatProvider};
use ragkit_core::embedding::EmbeddingProvider;
use ragkit_core::{Error, Result};

use crate::config::OpenAIConfig;

/// Provider for both embeddings and chat completions.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    embed_model: String,
}

impl OpenAIProvider {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if no API key is configured or the timeout is out
    /// of range; [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &OpenAIConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder()
            .timeout(config.timeout()?)
            .build()
            .map_err(|e| Error::Transport(Box::new(e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            embed_model: config.embed_model.clone(),
        })
    }

    fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| Error::Transport(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::debug!(%url, status = status.as_u16(), "provider returned error status");
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl EmbeddingProvider for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.embed_model
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingsRequest {
            model: &self.embed_model,
            input: texts,
        };
        let response: EmbeddingsResponse = self
            .post("embeddings", &request)?
            .json()
            .map_err(|e| Error::UnexpectedResponse(format!("decode embeddings: {}", e)))?;

        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }
}

impl ChatProvider for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
        };
        let response: ChatResponse = self
            .post("chat/completions", &request)?
            .json()
            .map_err(|e| Error::UnexpectedResponse(format!("decode chat completion: {}", e)))?;

        first_choice_content(response)
    }
}

fn first_choice_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| Error::UnexpectedResponse("response contained no choices".to_string()))
}
