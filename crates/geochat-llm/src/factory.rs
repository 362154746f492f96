use geochat_core::config::{Credentials, LayeredConfig, LlmProvider};
use geochat_core::error::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::ollama::OllamaChat;
use crate::openai::OpenAiCompatibleChat;
use crate::ports::ChatModel;

/// Build the chat model selected by the `llm` configuration key.
///
/// Fails with a configuration error when a hosted provider is selected and
/// no API key is available.
pub fn create_chat_model(
    config: &LayeredConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn ChatModel>> {
    let spec = config.llm_spec()?;
    let base_url = config.llm_base_url()?;
    let timeout = Duration::from_secs(config.request_timeout_secs.value);

    let model: Arc<dyn ChatModel> = match spec.provider {
        LlmProvider::DeepSeek | LlmProvider::OpenAi => {
            let api_key = credentials.require_llm_key(spec.provider)?.unwrap_or_default();
            Arc::new(OpenAiCompatibleChat::new(base_url, spec.model, api_key, timeout)?)
        }
        LlmProvider::Ollama => Arc::new(OllamaChat::new(base_url, spec.model, timeout)?),
    };

    tracing::info!(provider = ?spec.provider, model = model.model_name(), "Chat model ready");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geochat_core::config::CliConfigOverrides;

    #[test]
    fn test_hosted_provider_requires_key() {
        let config = LayeredConfig::with_defaults();
        let result = create_chat_model(&config, &Credentials::default());
        assert!(result.err().is_some_and(|e| e.is_configuration()));
    }

    #[test]
    fn test_deepseek_with_key() {
        let config = LayeredConfig::with_defaults();
        let credentials = Credentials { llm_api_key: Some("sk-test".into()), maps_api_key: None };
        let model = create_chat_model(&config, &credentials).unwrap();
        assert_eq!(model.model_name(), "deepseek-chat");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            llm: Some("ollama:qwen2.5".into()),
            ..Default::default()
        });
        let model = create_chat_model(&config, &Credentials::default()).unwrap();
        assert_eq!(model.model_name(), "qwen2.5");
    }
}
