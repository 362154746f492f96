//! Error types for GeoChat

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeochatError {
    // Catalog errors
    #[error("Dataset not found: {name}")]
    DatasetNotFound { name: String },

    #[error("Data directory not found at {path}")]
    DataDirNotFound { path: PathBuf },

    #[error("Unknown data type: {value}. Expected Point, MultiLineString, 3DTiles, or OSM")]
    UnknownDataType { value: String },

    // Filter errors
    #[error("Schema unavailable at {path}: {reason}")]
    SchemaUnavailable { path: String, reason: String },

    #[error("Failed to load features from {url}: {reason}")]
    FeatureLoad { url: String, reason: String },

    #[error("Invalid feature collection: {reason}")]
    InvalidFeatureCollection { reason: String },

    #[error("Entity not found in scene: {handle}")]
    EntityNotFound { handle: u64 },

    // LLM errors
    #[error("LLM unavailable: {reason}")]
    Llm { reason: String },

    #[error("Malformed AI response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    // External maps errors
    #[error("Maps provider error: {reason}")]
    Maps { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeochatError {
    /// Whether the error is a missing or invalid configuration value.
    ///
    /// Configuration failures are the only errors that terminate a chat
    /// request; everything else degrades to a component default.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GeochatError::ConfigMissing { .. } | GeochatError::ConfigInvalid { .. })
    }
}

impl From<serde_json::Error> for GeochatError {
    fn from(err: serde_json::Error) -> Self {
        GeochatError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeochatError>;
