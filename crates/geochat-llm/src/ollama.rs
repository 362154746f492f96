use async_trait::async_trait;
use geochat_core::error::{GeochatError, Result};
use geochat_core::models::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::openai::CONNECT_TIMEOUT;
use crate::ports::{ChatModel, ChatRequest};

/// Ollama chat implementation
pub struct OllamaChat {
    /// Base URL for Ollama API (e.g., "http://localhost:11434")
    base_url: String,

    /// Model name to use for chat
    model: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaChat {
    /// Create a new Ollama chat adapter
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
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
            client,
        })
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>) -> Result<Self> {
        Self::new("http://localhost:11434", model, Duration::from_secs(60))
    }

    fn build_body<'a>(&'a self, request: &'a ChatRequest) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model: &self.model,
            messages: &request.messages,
            stream: false,
            format: request.json_mode.then_some("json"),
            options: request.temperature.map(|temperature| OllamaOptions { temperature }),
        }
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| GeochatError::Llm {
                reason: format!(
                    "Failed to connect to Ollama at {}: {}. Ensure Ollama is running and run 'ollama pull {}'",
                    self.base_url, e, self.model
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeochatError::Llm {
                reason: format!("Ollama API error ({}): {}", status, error_text),
            });
        }

        let chat_response: OllamaChatResponse =
            response.json().await.map_err(|e| GeochatError::Llm {
                reason: format!("Failed to parse Ollama response: {}", e),
            })?;

        Ok(chat_response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama chat API
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama chat API
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}
