use geochat_core::models::Dataset;
use geochat_core::processing::{compute_statistics, scan_catalog, DatasetStatistics};
use geochat_core::GeochatError;
use geochat_store::files::resolve_data_path;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Catalog operations that touch the data directory
pub struct CatalogService;

impl CatalogService {
    /// Look up a dataset by name
    pub async fn find(state: &AppState, name: &str) -> Result<Dataset, ApiError> {
        state
            .catalog
            .get_dataset(name)
            .await?
            .ok_or_else(|| GeochatError::DatasetNotFound { name: name.to_string() }.into())
    }

    /// Read a dataset's GeoJSON file and compute its statistics
    pub async fn load_content(
        state: &AppState,
        dataset: &Dataset,
    ) -> Result<(Value, DatasetStatistics), ApiError> {
        let url = dataset.url();
        let load_error =
            |reason: String| GeochatError::FeatureLoad { url: url.clone(), reason };

        let path = resolve_data_path(&state.data_dir, &url)
            .ok_or_else(|| load_error("path is outside the data directory".to_string()))?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| load_error(e.to_string()))?;
        let document: Value =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

        let statistics = compute_statistics(&document);
        Ok((document, statistics))
    }

    /// Scan the data directory again, replace the catalog and drop the
    /// scene's cached data sources
    pub async fn rescan(state: &AppState) -> Result<usize, ApiError> {
        let data_dir = state.data_dir.clone();
        let datasets = tokio::task::spawn_blocking(move || scan_catalog(&data_dir))
            .await
            .map_err(|e| ApiError::internal("Catalog scan was interrupted").with_details(e.to_string()))??;

        let total = datasets.len();
        state.catalog.replace_all(datasets).await?;

        let unloaded = {
            let _guard = state.filter_lock.lock().await;
            state.scene.unload_all()
        };
        tracing::info!(total, unloaded, data_dir = %state.data_dir.display(), "Catalog rescanned");
        Ok(total)
    }
}
