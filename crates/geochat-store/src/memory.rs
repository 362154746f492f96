//! In-memory catalog store.
//!
//! Uses `RwLock::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an
//! unrecoverable state.

use async_trait::async_trait;
use geochat_core::error::Result;
use geochat_core::models::Dataset;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::CatalogStore;

/// In-memory implementation of [`CatalogStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    datasets: Arc<RwLock<HashMap<String, Dataset>>>,
}

impl MemoryCatalogStore {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `datasets`
    pub fn with_datasets(datasets: Vec<Dataset>) -> Self {
        let store = Self::new();
        store.replace(datasets);
        store
    }

    fn replace(&self, datasets: Vec<Dataset>) {
        let map = datasets.into_iter().map(|d| (d.name.clone(), d)).collect();
        *self.datasets.write().unwrap() = map;
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_datasets(&self) -> Result<Vec<Dataset>> {
        let datasets = self.datasets.read().unwrap();
        let mut list: Vec<Dataset> = datasets.values().cloned().collect();
        list.sort_by(|a, b| {
            a.display_order.cmp(&b.display_order).then_with(|| a.name.cmp(&b.name))
        });
        Ok(list)
    }

    async fn get_dataset(&self, name: &str) -> Result<Option<Dataset>> {
        let datasets = self.datasets.read().unwrap();
        Ok(datasets.get(name).cloned())
    }

    async fn replace_all(&self, datasets: Vec<Dataset>) -> Result<()> {
        let count = datasets.len();
        self.replace(datasets);
        tracing::info!(count, "Catalog replaced");
        Ok(())
    }
}
