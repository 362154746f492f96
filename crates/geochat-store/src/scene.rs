//! Headless in-memory scene graph.
//!
//! Holds one entity per GeoJSON feature with the display state a 3D viewer
//! would keep: visibility, terrain clamping and distance-based display
//! conditions. Data sources are cached per URL, so loading a URL again
//! returns the entities created the first time until the scene is unloaded.
//!
//! Uses `RwLock::unwrap()` intentionally; see [`crate::memory`].

use async_trait::async_trait;
use geochat_core::error::{GeochatError, Result};
use geochat_core::models::PropertyBag;
use geochat_core::ports::{EntityHandle, LoadOptions, SceneGraph};
use geochat_core::processing::validate_feature_collection;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::files::resolve_data_path;

/// Camera distance band outside which an entity is not drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceDisplayCondition {
    pub near: f64,
    pub far: f64,
}

/// Display state of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntity {
    pub url: String,
    pub feature: Value,
    pub show: bool,
    pub clamp_to_ground: bool,
    pub distance_display_condition: Option<DistanceDisplayCondition>,
    pub scale_by_distance: Option<(f64, f64)>,
}

#[derive(Debug, Default)]
struct SceneState {
    /// Loaded data sources, URL to entity handles in feature order
    sources: HashMap<String, Vec<EntityHandle>>,
    entities: BTreeMap<EntityHandle, SceneEntity>,
    /// Documents registered without a backing file
    documents: HashMap<String, Value>,
    next_id: u64,
}

/// In-memory implementation of [`SceneGraph`]
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    root: Option<PathBuf>,
    state: Arc<RwLock<SceneState>>,
}

impl MemoryScene {
    /// Scene that only serves documents registered with [`MemoryScene::insert_document`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene that reads data sources from files below `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()), state: Default::default() }
    }

    /// Register a GeoJSON document under `url`
    pub fn insert_document(&self, url: impl Into<String>, document: Value) {
        self.state.write().unwrap().documents.insert(url.into(), document);
    }

    /// Snapshot of an entity's display state
    pub fn entity(&self, handle: EntityHandle) -> Option<SceneEntity> {
        self.state.read().unwrap().entities.get(&handle).cloned()
    }

    /// Handles of the data source loaded from `url`, if any
    pub fn handles_for(&self, url: &str) -> Vec<EntityHandle> {
        self.state.read().unwrap().sources.get(url).cloned().unwrap_or_default()
    }

    /// Set a distance display condition, as a viewer's styling would
    pub fn set_distance_display_condition(
        &self,
        handle: EntityHandle,
        condition: DistanceDisplayCondition,
    ) -> Result<()> {
        self.with_entity(handle, |e| e.distance_display_condition = Some(condition))
    }

    /// Features of `url` that are currently shown, as a FeatureCollection
    pub fn visible_features(&self, url: &str) -> Value {
        let state = self.state.read().unwrap();
        let features: Vec<Value> = state
            .sources
            .get(url)
            .into_iter()
            .flatten()
            .filter_map(|h| state.entities.get(h))
            .filter(|e| e.show)
            .map(|e| e.feature.clone())
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    /// Drop every loaded data source and its entities.
    ///
    /// Registered documents stay; the next load of a URL reads it afresh.
    /// Returns the number of data sources dropped.
    pub fn unload_all(&self) -> usize {
        let mut state = self.state.write().unwrap();
        let dropped = state.sources.len();
        state.sources.clear();
        state.entities.clear();
        dropped
    }

    fn with_entity(&self, handle: EntityHandle, f: impl FnOnce(&mut SceneEntity)) -> Result<()> {
        let mut state = self.state.write().unwrap();
        let entity = state
            .entities
            .get_mut(&handle)
            .ok_or(GeochatError::EntityNotFound { handle: handle.0 })?;
        f(entity);
        Ok(())
    }

    async fn read_document(&self, url: &str) -> Result<Value> {
        if let Some(document) = self.state.read().unwrap().documents.get(url).cloned() {
            return Ok(document);
        }

        let root = self.root.as_ref().ok_or_else(|| GeochatError::FeatureLoad {
            url: url.to_string(),
            reason: "no document registered for this URL".to_string(),
        })?;
        let path = resolve_data_path(root, url).ok_or_else(|| GeochatError::FeatureLoad {
            url: url.to_string(),
            reason: "path is outside the data directory".to_string(),
        })?;

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| GeochatError::FeatureLoad { url: url.to_string(), reason: e.to_string() })?;
        serde_json::from_str(&content)
            .map_err(|e| GeochatError::FeatureLoad { url: url.to_string(), reason: e.to_string() })
    }
}

#[async_trait]
impl SceneGraph for MemoryScene {
    async fn load_features(&self, url: &str, options: LoadOptions) -> Result<Vec<EntityHandle>> {
        {
            let mut state = self.state.write().unwrap();
            if let Some(handles) = state.sources.get(url).cloned() {
                for handle in &handles {
                    if let Some(entity) = state.entities.get_mut(handle) {
                        entity.clamp_to_ground = options.clamp_to_ground;
                    }
                }
                return Ok(handles);
            }
        }

        let document = self.read_document(url).await?;
        validate_feature_collection(&document).into_result().map_err(|e| {
            GeochatError::FeatureLoad { url: url.to_string(), reason: e.to_string() }
        })?;

        let features = document.get("features").and_then(Value::as_array).cloned().unwrap_or_default();

        let mut state = self.state.write().unwrap();
        // Another task may have loaded the same URL while the file was read
        if let Some(handles) = state.sources.get(url).cloned() {
            return Ok(handles);
        }

        let mut handles = Vec::with_capacity(features.len());
        for feature in features {
            let handle = EntityHandle(state.next_id);
            state.next_id += 1;
            state.entities.insert(
                handle,
                SceneEntity {
                    url: url.to_string(),
                    feature,
                    show: true,
                    clamp_to_ground: options.clamp_to_ground,
                    distance_display_condition: None,
                    scale_by_distance: None,
                },
            );
            handles.push(handle);
        }
        state.sources.insert(url.to_string(), handles.clone());

        tracing::debug!(url, entities = handles.len(), "Loaded data source");
        Ok(handles)
    }

    fn reset_display_conditions(&self, handle: EntityHandle) -> Result<()> {
        self.with_entity(handle, |e| {
            e.distance_display_condition = None;
            e.scale_by_distance = None;
        })
    }

    fn set_visible(&self, handle: EntityHandle, visible: bool) -> Result<()> {
        self.with_entity(handle, |e| e.show = visible)
    }

    fn properties_of(&self, handle: EntityHandle) -> Result<PropertyBag> {
        let state = self.state.read().unwrap();
        let entity = state
            .entities
            .get(&handle)
            .ok_or(GeochatError::EntityNotFound { handle: handle.0 })?;
        Ok(entity.feature.get("properties").and_then(Value::as_object).cloned().unwrap_or_default())
    }
}
