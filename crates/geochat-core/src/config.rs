use crate::error::{GeochatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Chat completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    DeepSeek,
    OpenAi,
    Ollama,
}

impl LlmProvider {
    /// Base URL used when no override is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "https://api.deepseek.com",
            LlmProvider::OpenAi => "https://api.openai.com",
            LlmProvider::Ollama => "http://localhost:11434",
        }
    }

    /// Hosted providers need a bearer token; a local Ollama does not
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmProvider::Ollama)
    }
}

/// Parsed `"<provider>:<model>"` LLM selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSpec {
    pub provider: LlmProvider,
    pub model: String,
}

/// Layered configuration for GeoChat
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub llm: ConfigValue<String>,
    pub llm_base_url: ConfigValue<Option<String>>,
    pub data_dir: ConfigValue<PathBuf>,
    pub mapping_file: ConfigValue<Option<PathBuf>>,
    pub request_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            llm: ConfigValue::new("deepseek:deepseek-chat".to_string(), ConfigSource::Default),
            llm_base_url: ConfigValue::new(None, ConfigSource::Default),
            data_dir: ConfigValue::new(PathBuf::from("public"), ConfigSource::Default),
            mapping_file: ConfigValue::new(None, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(60, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeochatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeochatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(llm) = file_config.llm {
            parse_llm_spec(&llm)?;
            self.llm.update(llm, ConfigSource::File);
        }

        if let Some(base_url) = file_config.llm_base_url {
            self.llm_base_url.update(Some(base_url), ConfigSource::File);
        }

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }

        if let Some(mapping_file) = file_config.mapping_file {
            self.mapping_file.update(Some(mapping_file), ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(timeout, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOCHAT_LLM
        if let Ok(llm) = env::var("GEOCHAT_LLM") {
            match parse_llm_spec(&llm) {
                Ok(_) => self.llm.update(llm, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOCHAT_LLM value '{}': expected <provider>:<model> with provider deepseek, openai, or ollama",
                    llm
                ),
            }
        }

        // GEOCHAT_LLM_BASE_URL
        if let Ok(base_url) = env::var("GEOCHAT_LLM_BASE_URL") {
            self.llm_base_url.update(Some(base_url), ConfigSource::Environment);
        }

        // GEOCHAT_DATA_DIR
        if let Ok(data_dir) = env::var("GEOCHAT_DATA_DIR") {
            self.data_dir.update(PathBuf::from(data_dir), ConfigSource::Environment);
        }

        // GEOCHAT_MAPPING_FILE
        if let Ok(mapping_file) = env::var("GEOCHAT_MAPPING_FILE") {
            self.mapping_file.update(Some(PathBuf::from(mapping_file)), ConfigSource::Environment);
        }

        // GEOCHAT_REQUEST_TIMEOUT
        if let Ok(timeout_str) = env::var("GEOCHAT_REQUEST_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => {
                    self.request_timeout_secs.update(timeout, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid GEOCHAT_REQUEST_TIMEOUT value '{}': expected seconds as an integer",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(llm) = overrides.llm {
            self.llm.update(llm, ConfigSource::Cli);
        }

        if let Some(base_url) = overrides.llm_base_url {
            self.llm_base_url.update(Some(base_url), ConfigSource::Cli);
        }

        if let Some(data_dir) = overrides.data_dir {
            self.data_dir.update(data_dir, ConfigSource::Cli);
        }

        if let Some(mapping_file) = overrides.mapping_file {
            self.mapping_file.update(Some(mapping_file), ConfigSource::Cli);
        }
    }

    /// Resolved LLM selector
    pub fn llm_spec(&self) -> Result<LlmSpec> {
        parse_llm_spec(&self.llm.value)
    }

    /// Base URL for the configured LLM, falling back to the provider default
    pub fn llm_base_url(&self) -> Result<String> {
        let spec = self.llm_spec()?;
        Ok(self
            .llm_base_url
            .value
            .clone()
            .unwrap_or_else(|| spec.provider.default_base_url().to_string()))
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("llm".to_string(), (self.llm.value.clone(), self.llm.source));

        map.insert(
            "llm_base_url".to_string(),
            (
                self.llm_base_url.value.clone().unwrap_or_else(|| "(provider default)".to_string()),
                self.llm_base_url.source,
            ),
        );

        map.insert(
            "data_dir".to_string(),
            (self.data_dir.value.display().to_string(), self.data_dir.source),
        );

        map.insert(
            "mapping_file".to_string(),
            (
                self.mapping_file
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(built-in)".to_string()),
                self.mapping_file.source,
            ),
        );

        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    llm: Option<String>,
    llm_base_url: Option<String>,
    data_dir: Option<PathBuf>,
    mapping_file: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub llm: Option<String>,
    pub llm_base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub mapping_file: Option<PathBuf>,
}

/// API credentials. Only ever read from the environment.
#[derive(Clone, Default)]
pub struct Credentials {
    pub llm_api_key: Option<String>,
    pub maps_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("maps_api_key", &self.maps_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from `GEOCHAT_LLM_API_KEY` (falling back to
    /// `DEEPSEEK_API_KEY`, then `OPENAI_API_KEY`) and `GOOGLE_MAPS_API_KEY`
    pub fn from_env() -> Self {
        let llm_api_key = ["GEOCHAT_LLM_API_KEY", "DEEPSEEK_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|key| non_blank_env(key));

        Self {
            llm_api_key,
            maps_api_key: non_blank_env("GOOGLE_MAPS_API_KEY"),
        }
    }

    /// LLM key for a provider that needs one
    pub fn require_llm_key(&self, provider: LlmProvider) -> Result<Option<&str>> {
        if !provider.requires_api_key() {
            return Ok(self.llm_api_key.as_deref());
        }

        self.llm_api_key.as_deref().map(Some).ok_or_else(|| GeochatError::ConfigMissing {
            key: "GEOCHAT_LLM_API_KEY".to_string(),
        })
    }

    /// Google Maps key
    pub fn require_maps_key(&self) -> Result<&str> {
        self.maps_api_key.as_deref().ok_or_else(|| GeochatError::ConfigMissing {
            key: "GOOGLE_MAPS_API_KEY".to_string(),
        })
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an LLM selector such as `deepseek:deepseek-chat` or `ollama:llama3.1`
pub fn parse_llm_spec(s: &str) -> Result<LlmSpec> {
    let (provider, model) = s.split_once(':').ok_or_else(|| GeochatError::ConfigInvalid {
        key: "llm".to_string(),
        reason: format!("Invalid LLM selector: {}. Use <provider>:<model>", s),
    })?;

    let provider = match provider.trim().to_lowercase().as_str() {
        "deepseek" => LlmProvider::DeepSeek,
        "openai" => LlmProvider::OpenAi,
        "ollama" => LlmProvider::Ollama,
        other => {
            return Err(GeochatError::ConfigInvalid {
                key: "llm".to_string(),
                reason: format!("Unknown LLM provider: {}. Use deepseek, openai, or ollama", other),
            })
        }
    };

    let model = model.trim();
    if model.is_empty() {
        return Err(GeochatError::ConfigInvalid {
            key: "llm".to_string(),
            reason: "Model name is empty".to_string(),
        });
    }

    Ok(LlmSpec { provider, model: model.to_string() })
}
