use geochat_core::config::{Credentials, LayeredConfig};
use geochat_core::models::TypeMapping;
use geochat_core::ports::MapsProvider;
use geochat_core::processing::scan_catalog;
use geochat_filter::FilterService;
use geochat_llm::{create_chat_model, ChatModel};
use geochat_maps::create_maps_provider;
use geochat_retrieval::ChatPipeline;
use geochat_store::{CatalogStore, FileSchemaSource, MemoryCatalogStore, MemoryScene};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    /// Root the dataset URLs are served from
    pub data_dir: PathBuf,
    pub catalog: Arc<dyn CatalogStore>,
    pub mapping: Arc<TypeMapping>,
    pub scene: Arc<MemoryScene>,
    pub filters: Arc<FilterService>,
    /// Serializes filter runs so scene mutations never interleave
    pub filter_lock: Arc<Mutex<()>>,
    /// `None` when no LLM credential is configured
    pub chat: Option<Arc<ChatPipeline>>,
    /// `None` when no maps credential is configured
    pub maps: Option<Arc<dyn MapsProvider>>,
}

impl AppState {
    pub fn new(
        data_dir: PathBuf,
        catalog: Arc<dyn CatalogStore>,
        mapping: Arc<TypeMapping>,
        chat_model: Option<Arc<dyn ChatModel>>,
        maps: Option<Arc<dyn MapsProvider>>,
    ) -> Self {
        let scene = Arc::new(MemoryScene::with_root(&data_dir));
        let filters = Arc::new(FilterService::new(
            Arc::new(FileSchemaSource::new(&data_dir)),
            scene.clone(),
            mapping.clone(),
        ));
        let chat = chat_model.map(|model| Arc::new(ChatPipeline::new(model, catalog.clone())));

        Self {
            data_dir,
            catalog,
            mapping,
            scene,
            filters,
            filter_lock: Arc::new(Mutex::new(())),
            chat,
            maps,
        }
    }

    /// Build the state from layered configuration.
    ///
    /// Missing credentials disable the chat or maps endpoints instead of
    /// failing startup; a missing data directory starts with an empty catalog.
    pub async fn from_config(
        config: &LayeredConfig,
        credentials: &Credentials,
    ) -> geochat_core::Result<Self> {
        let data_dir = config.data_dir.value.clone();

        let mapping = match &config.mapping_file.value {
            Some(path) => TypeMapping::load_from_file(path)?,
            None => TypeMapping::default(),
        };

        let catalog = Arc::new(MemoryCatalogStore::new());
        match scan_catalog(&data_dir) {
            Ok(datasets) => catalog.replace_all(datasets).await?,
            Err(e) => tracing::warn!(error = %e, "Starting with an empty catalog"),
        }

        let chat_model = match create_chat_model(config, credentials) {
            Ok(model) => Some(model),
            Err(e) if e.is_configuration() => {
                tracing::warn!(error = %e, "Chat endpoints disabled");
                None
            }
            Err(e) => return Err(e),
        };

        let maps = match create_maps_provider(config, credentials) {
            Ok(provider) => Some(provider),
            Err(e) if e.is_configuration() => {
                tracing::warn!(error = %e, "Maps endpoint disabled");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self::new(data_dir, catalog, Arc::new(mapping), chat_model, maps))
    }

    pub fn chat_pipeline(&self) -> Result<&ChatPipeline, ApiError> {
        self.chat.as_deref().ok_or_else(|| {
            ApiError::unauthorized("LLM API key is not configured")
                .with_details("Set GEOCHAT_LLM_API_KEY (or DEEPSEEK_API_KEY) and restart the server")
        })
    }

    pub fn maps_provider(&self) -> Result<&dyn MapsProvider, ApiError> {
        self.maps.as_deref().ok_or_else(|| {
            ApiError::service_unavailable("Google Maps API key is not configured")
                .with_details("Set GOOGLE_MAPS_API_KEY and restart the server")
        })
    }
}
