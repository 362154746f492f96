//! GeoChat Store - Catalog port and in-memory adapters
//!
//! This crate defines the dataset catalog port and provides in-memory
//! adapters for the catalog and the scene graph, plus a file-backed
//! schema source.

pub mod files;
pub mod memory;
pub mod ports;
pub mod scene;

pub use files::FileSchemaSource;
pub use memory::MemoryCatalogStore;
pub use ports::CatalogStore;
pub use scene::MemoryScene;
