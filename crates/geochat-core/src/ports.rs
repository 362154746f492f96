//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod maps;
pub mod scene;
pub mod schema_source;

pub use maps::MapsProvider;
pub use scene::{EntityHandle, LoadOptions, SceneGraph};
pub use schema_source::SchemaSource;
