//! GeoChat LLM - Chat completion port and adapters
//!
//! This crate defines the chat completion port, adapters for
//! OpenAI-compatible endpoints (DeepSeek by default) and Ollama, and the
//! strict decoding used on model replies.

pub mod decode;
pub mod factory;
pub mod ollama;
pub mod openai;
pub mod ports;

// Re-export main types
pub use decode::{decode_bool, decode_json, extract_json_object, DecodeError};
pub use factory::create_chat_model;
pub use ollama::OllamaChat;
pub use openai::OpenAiCompatibleChat;
pub use ports::{ChatModel, ChatRequest};
