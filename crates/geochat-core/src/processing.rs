//! Catalog scanning and GeoJSON inspection

pub mod scan;
pub mod stats;
pub mod summary;
pub mod validation;

pub use scan::{scan_catalog, scan_dataset, schema_file_path};
pub use stats::{compute_statistics, Bounds, DatasetStatistics};
pub use summary::{property_description, summarize_features};
pub use validation::{validate_feature_collection, FeatureCollectionValidation};
