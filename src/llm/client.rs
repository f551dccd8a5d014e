//! Async LLM client for strategy generation
//!
//! A model-agnostic HTTP client for calling LLM APIs. Supports both the
//! Anthropic Messages API and OpenAI-compatible chat APIs (DeepSeek, etc).
//! The rest of the crate only sees the [`NarrativeGenerator`] trait.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::core::config::LlmConfig;
use crate::core::error::{MatchupError, Result};

/// Anything that turns a prompt into narrative text
pub trait NarrativeGenerator: Send + Sync {
    /// Send `prompt` and return the generated narrative
    ///
    /// A successful call whose payload holds no text fails with
    /// `MalformedResponse`; every other failure is `Generation`.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// API format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            max_tokens: LlmConfig::default().max_tokens,
            api_format,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Create a client from resolved configuration
    ///
    /// Fails when no API key was configured.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| MatchupError::Config("LLM_API_KEY not set".into()))?;
        Ok(Self::new(api_key, config.api_url.clone(), config.model.clone())
            .with_max_tokens(config.max_tokens))
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            // DeepSeek, OpenAI, and other compatible APIs use OpenAI format
            ApiFormat::OpenAI
        }
    }

    pub fn api_format(&self) -> ApiFormat {
        self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user message and return the text of the reply
    pub async fn complete(&self, user: &str) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            format = ?self.api_format,
            prompt_len = user.len(),
            "sending completion request"
        );
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(user).await,
            ApiFormat::OpenAI => self.complete_openai(user).await,
        }
    }

    async fn complete_anthropic(&self, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| MatchupError::Generation(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MatchupError::Generation(e.to_string()))?;
        tracing::debug!(%status, body_len = body.len(), "anthropic response received");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        extract_anthropic_text(&body)
    }

    async fn complete_openai(&self, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| MatchupError::Generation(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MatchupError::Generation(e.to_string()))?;
        tracing::debug!(%status, body_len = body.len(), "openai response received");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        extract_openai_text(&body)
    }
}

impl NarrativeGenerator for LlmClient {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        self.complete(prompt)
    }
}

/// Build the error for a non-success status, using the API's message if any
fn api_error(status: StatusCode, body: &str) -> MatchupError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| "Unknown error".into());
    tracing::warn!(%status, %message, "generation API returned an error");
    MatchupError::Generation(format!("API error {}: {}", status.as_u16(), message))
}

fn extract_anthropic_text(body: &str) -> Result<String> {
    let completion: AnthropicResponse = serde_json::from_str(body)
        .map_err(|e| MatchupError::MalformedResponse(format!("invalid JSON: {}", e)))?;
    completion
        .content
        .into_iter()
        .next()
        .and_then(|c| c.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| MatchupError::MalformedResponse("response contained no text".into()))
}

fn extract_openai_text(body: &str) -> Result<String> {
    let completion: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| MatchupError::MalformedResponse(format!("invalid JSON: {}", e)))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| MatchupError::MalformedResponse("response contained no text".into()))
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

// OpenAI-compatible API format (DeepSeek, OpenAI, etc.)
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}
