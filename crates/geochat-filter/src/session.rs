//! Caller-owned filter state and the operations over it

use geochat_core::models::{FieldMap, FilterCriteria, TypeMapping};
use geochat_core::ports::{SceneGraph, SchemaSource};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::{ExecutionReport, FilterExecutionEngine};
use crate::predicate::compile;
use crate::schema::SchemaRegistry;

/// Filter state of one viewer: the active criteria, the dataset URLs last
/// loaded, and the fields those datasets expose
#[derive(Debug, Clone, Serialize)]
pub struct FilterSession {
    pub id: Uuid,
    pub criteria: FilterCriteria,
    pub loaded_urls: Vec<String>,
    pub field_map: FieldMap,
}

impl FilterSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            criteria: FilterCriteria::new(),
            loaded_urls: Vec::new(),
            field_map: FieldMap::new(),
        }
    }
}

impl Default for FilterSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema loading, compilation and execution wired to one scene
pub struct FilterService {
    registry: SchemaRegistry,
    engine: FilterExecutionEngine,
    mapping: Arc<TypeMapping>,
}

impl FilterService {
    pub fn new(
        schemas: Arc<dyn SchemaSource>,
        scene: Arc<dyn SceneGraph>,
        mapping: Arc<TypeMapping>,
    ) -> Self {
        Self {
            registry: SchemaRegistry::new(schemas, mapping.clone()),
            engine: FilterExecutionEngine::new(scene),
            mapping,
        }
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    /// Fields of the given filter types, without touching any session
    pub async fn fields_for_types(&self, data_types: &[String]) -> FieldMap {
        self.registry.load_fields_for_datasets(data_types).await
    }

    /// Record `urls` as the loaded datasets and load their fields
    pub async fn load(&self, session: &mut FilterSession, urls: Vec<String>) {
        let mut data_types: Vec<String> = Vec::new();
        for url in &urls {
            match self.mapping.get(url) {
                Some(entry) if !data_types.contains(&entry.data_type) => {
                    data_types.push(entry.data_type.clone())
                }
                Some(_) => {}
                None => tracing::warn!(url = %url, "No type mapping for URL"),
            }
        }

        session.field_map = self.registry.load_fields_for_datasets(&data_types).await;
        session.loaded_urls = urls;
        tracing::info!(
            session = %session.id,
            urls = session.loaded_urls.len(),
            types = session.field_map.len(),
            "Filter fields loaded"
        );
    }

    /// Replace the session's criteria and filter its loaded URLs
    pub async fn apply(&self, session: &mut FilterSession, criteria: FilterCriteria) -> ExecutionReport {
        session.criteria = criteria;
        let predicates = compile(&session.criteria, &session.field_map);
        self.engine.apply(&session.loaded_urls, &predicates, &self.mapping).await
    }

    /// Drop all criteria and show every entity of the loaded URLs again
    pub async fn clear(&self, session: &mut FilterSession) -> ExecutionReport {
        session.criteria.clear();
        self.engine.reset(&session.loaded_urls, &self.mapping).await
    }
}
