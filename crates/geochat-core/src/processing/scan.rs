use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::summary::summarize_features;
use super::validation::validate_feature_collection;
use crate::error::{GeochatError, Result};
use crate::models::{DataType, Dataset};

/// Data types scanned from disk, each stored under `data/geoJSON/<type>/`
const SCANNED_TYPES: [DataType; 2] = [DataType::Point, DataType::MultiLineString];

fn geojson_root(data_dir: &Path) -> PathBuf {
    data_dir.join("data").join("geoJSON")
}

/// Location of the schema file for a dataset, if its type has one
pub fn schema_file_path(data_dir: &Path, data_type: DataType, name: &str) -> Option<PathBuf> {
    match data_type {
        DataType::Point | DataType::MultiLineString => Some(
            geojson_root(data_dir)
                .join(data_type.as_str())
                .join("schema")
                .join(format!("{}.schema.geojson", name)),
        ),
        DataType::Tiles3D | DataType::Osm => None,
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// `definitions.Properties.properties` of the dataset's schema file
fn load_schema_properties(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    match read_json(path) {
        Ok(schema) => schema.pointer("/definitions/Properties/properties").cloned(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable schema file");
            None
        }
    }
}

/// Build the catalog entry for one GeoJSON file under `data_dir`
pub fn scan_dataset(data_dir: &Path, data_type: DataType, path: &Path) -> Result<Dataset> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| GeochatError::InvalidFeatureCollection {
            reason: format!("Unusable file name: {}", path.display()),
        })?
        .to_string();

    let document = read_json(path)?;
    validate_feature_collection(&document).into_result()?;

    let schema_properties =
        schema_file_path(data_dir, data_type, &name).and_then(|p| load_schema_properties(&p));
    let schema_summary = summarize_features(&document, schema_properties.as_ref());

    let file_path = path
        .strip_prefix(data_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Ok(Dataset {
        name,
        data_type,
        file_path,
        visible: true,
        display_order: data_type.display_order(),
        schema_summary,
        scanned_at: Utc::now(),
    })
}

/// Scan `<data_dir>/data/geoJSON/{Point,MultiLineString}/*.geojson`.
///
/// Files that fail to parse or validate are logged and skipped. Entries are
/// ordered by display order, then name.
pub fn scan_catalog(data_dir: &Path) -> Result<Vec<Dataset>> {
    let root = geojson_root(data_dir);
    if !root.is_dir() {
        return Err(GeochatError::DataDirNotFound { path: root });
    }

    let mut datasets = Vec::new();

    for data_type in SCANNED_TYPES {
        let dir = root.join(data_type.as_str());
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "No directory for data type");
            continue;
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "geojson"))
            .collect();
        files.sort();

        for path in files {
            match scan_dataset(data_dir, data_type, &path) {
                Ok(dataset) => {
                    tracing::debug!(
                        name = %dataset.name,
                        data_type = %data_type,
                        features = dataset.feature_count(),
                        "Scanned dataset"
                    );
                    datasets.push(dataset);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping dataset");
                }
            }
        }
    }

    datasets.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.name.cmp(&b.name)));
    tracing::info!(count = datasets.len(), root = %root.display(), "Catalog scan complete");

    Ok(datasets)
}
