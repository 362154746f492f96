//! OpenAI-compatible chat completion adapter
//!
//! Speaks the `/v1/chat/completions` protocol used by DeepSeek, OpenAI and
//! most hosted gateways.

use async_trait::async_trait;
use geochat_core::error::{GeochatError, Result};
use geochat_core::models::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{ChatModel, ChatRequest};

/// Connect timeout applied to every request
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat adapter for OpenAI-compatible endpoints
pub struct OpenAiCompatibleChat {
    /// Base URL without the `/v1/...` suffix (e.g., "https://api.deepseek.com")
    base_url: String,

    /// Model name sent with each request
    model: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiCompatibleChat {
    /// Create a new adapter with the given whole-request timeout
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| GeochatError::ConfigInvalid {
                key: "llm_base_url".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// DeepSeek's hosted `deepseek-chat` model
    pub fn deepseek(api_key: impl Into<String>) -> Result<Self> {
        Self::new("https://api.deepseek.com", "deepseek-chat", api_key, Duration::from_secs(60))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_body<'a>(&'a self, request: &'a ChatRequest) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            response_format: request.json_mode.then_some(ResponseFormat { kind: "json_object" }),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = self.build_body(request);

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            temperature = ?request.temperature,
            json_mode = request.json_mode,
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeochatError::Llm {
                reason: format!("Failed to reach {}: {}", self.base_url, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeochatError::Llm {
                reason: format!("Chat API error ({}): {}", status, error_text),
            });
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| GeochatError::Llm {
            reason: format!("Failed to parse chat response: {}", e),
        })?;

        extract_content(completion)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn extract_content(completion: CompletionResponse) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GeochatError::Llm { reason: "Chat response has no content".to_string() })
}

/// Request body for the chat completions API
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
