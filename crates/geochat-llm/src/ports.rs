//! LLM port definitions

use async_trait::async_trait;
use geochat_core::error::Result;
use geochat_core::models::Message;

/// A single chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,

    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,

    /// Ask the provider to constrain the reply to a JSON object
    pub json_mode: bool,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, temperature: None, json_mode: false }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Port for chat completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a completion and return the assistant's reply text
    ///
    /// Transport failures, non-success statuses and replies without
    /// content are reported as [`geochat_core::GeochatError::Llm`].
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Get the name/identifier of the chat model
    fn model_name(&self) -> &str;
}
