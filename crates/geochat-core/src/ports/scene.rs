use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::PropertyBag;

/// Opaque reference to an entity held by a scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Options applied when a data source is loaded into the scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drape geometry onto the terrain surface
    pub clamp_to_ground: bool,
}

/// The part of a rendering scene the filter engine needs: load a GeoJSON
/// data source, read entity properties, and toggle entity visibility.
///
/// Loading the same URL twice yields handles to the same entities, so
/// visibility changes made by an earlier pass can be undone by a later one.
#[async_trait]
pub trait SceneGraph: Send + Sync {
    /// Load (or re-use) the data source at `url` and return its entities
    async fn load_features(&self, url: &str, options: LoadOptions) -> Result<Vec<EntityHandle>>;

    /// Clear distance-based display conditions and scaling on an entity
    fn reset_display_conditions(&self, handle: EntityHandle) -> Result<()>;

    /// Show or hide an entity
    fn set_visible(&self, handle: EntityHandle, visible: bool) -> Result<()>;

    /// Snapshot of the entity's properties
    fn properties_of(&self, handle: EntityHandle) -> Result<PropertyBag>;
}
