//! Model API client.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default messages endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
/// API version header value.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Why an AI plan could not be produced.
///
/// Never leaves the planner: every variant collapses to "no plan".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AiPlanFailure {
    #[error("model API unreachable: {0}")]
    Transport(String),

    #[error("model API returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("model API response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("model output contained no text block")]
    NoText,

    #[error("model output contained no JSON array")]
    NoJsonArray,

    #[error("model output array is malformed: {0}")]
    Malformed(String),

    #[error("model output array is empty")]
    Empty,
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Request body for one model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
}

impl MessageRequest {
    /// Single-turn request with a system prompt.
    #[must_use]
    pub fn single_turn(
        model: impl Into<String>,
        max_tokens: u32,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            system: system.into(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.into(),
            }],
        }
    }
}

/// A content block of a model response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Response body of one model call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl MessageResponse {
    /// Text of the first content block, if that block is text.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .first()
            .filter(|b| b.kind == "text")
            .and_then(|b| b.text.as_deref())
    }

    /// Convenience constructor for a single text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: Some(text.into()),
            }],
        }
    }
}

/// Anything that can answer a model request.
pub trait MessageClient: Send + Sync {
    fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, AiPlanFailure>;
}

/// Model API client configuration.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP client for the model API.
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, AiPlanFailure> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AiPlanFailure::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the key out of logs
        f.debug_struct("AnthropicClient")
            .field("endpoint", &self.config.endpoint)
            .field("api_version", &self.config.api_version)
            .finish_non_exhaustive()
    }
}

impl MessageClient for AnthropicClient {
    fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, AiPlanFailure> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(request)
            .send()
            .map_err(|e| AiPlanFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_default();
            return Err(AiPlanFailure::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .map_err(|e| AiPlanFailure::InvalidResponse(e.to_string()))
    }
}
