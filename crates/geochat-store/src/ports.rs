use async_trait::async_trait;
use geochat_core::error::Result;
use geochat_core::models::{CatalogStats, Dataset};

/// Port for the dataset catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All entries ordered by display order, then name
    async fn list_datasets(&self) -> Result<Vec<Dataset>>;

    /// Retrieve an entry by its unique name
    async fn get_dataset(&self, name: &str) -> Result<Option<Dataset>>;

    /// Replace the whole catalog with a fresh scan
    async fn replace_all(&self, datasets: Vec<Dataset>) -> Result<()>;

    /// Counts over the catalog
    async fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats::from_datasets(&self.list_datasets().await?))
    }
}
