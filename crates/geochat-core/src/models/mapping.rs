//! Dataset URL to filter type mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{GeochatError, Result};

/// How a loaded dataset URL is treated by the filter subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMappingEntry {
    /// Location of the JSON schema describing the dataset's properties
    #[serde(default)]
    pub schema_path: Option<String>,

    /// Filter type, also the namespace prefix of its criteria
    pub data_type: String,

    pub display_name: String,

    /// `Point`, `LineString`, `MultiLineString`, ...
    pub geometry_type: String,
}

impl TypeMappingEntry {
    /// Points and lines are draped onto the terrain when loaded
    pub fn clamp_to_ground(&self) -> bool {
        matches!(self.geometry_type.as_str(), "Point" | "MultiPoint" | "LineString" | "MultiLineString")
    }
}

/// Table from dataset URL to [`TypeMappingEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMapping(BTreeMap<String, TypeMappingEntry>);

impl TypeMapping {
    pub fn new(entries: BTreeMap<String, TypeMappingEntry>) -> Self {
        Self(entries)
    }

    /// Read a mapping table from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GeochatError::ConfigInvalid {
            key: "mapping_file".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| GeochatError::ConfigInvalid {
            key: "mapping_file".to_string(),
            reason: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    pub fn get(&self, url: &str) -> Option<&TypeMappingEntry> {
        self.0.get(url)
    }

    /// Entry for a filter type, preferring one that names a schema
    pub fn entry_for_type(&self, data_type: &str) -> Option<&TypeMappingEntry> {
        let mut entries = self.0.values().filter(|e| e.data_type == data_type);
        let first = entries.next()?;
        if first.schema_path.is_some() {
            return Some(first);
        }
        entries.find(|e| e.schema_path.is_some()).or(Some(first))
    }

    /// URLs whose filter type is one of `data_types`
    pub fn urls_for_types<'a>(&'a self, data_types: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(_, e)| data_types.iter().any(|t| t == &e.data_type))
            .map(|(url, _)| url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeMappingEntry)> {
        self.0.iter().map(|(url, e)| (url.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TypeMapping {
    /// Mapping for the Chiba City PLATEAU GeoJSON datasets
    fn default() -> Self {
        let point = |name: &str, display: &str| {
            (
                format!("/data/geoJSON/Point/{}.geojson", name),
                TypeMappingEntry {
                    schema_path: Some(format!("/data/geoJSON/Point/schema/{}.schema.geojson", name)),
                    data_type: name.to_string(),
                    display_name: display.to_string(),
                    geometry_type: "Point".to_string(),
                },
            )
        };
        let line = |name: &str, display: &str| {
            (
                format!("/data/geoJSON/MultiLineString/{}.geojson", name),
                TypeMappingEntry {
                    schema_path: None,
                    data_type: name.to_string(),
                    display_name: display.to_string(),
                    geometry_type: "MultiLineString".to_string(),
                },
            )
        };

        Self(
            [
                point("landmark", "ランドマーク"),
                point("park", "公園"),
                point("shelter", "避難所"),
                point("station", "駅"),
                line("border", "境界線"),
                line("emergency_route", "緊急避難路"),
                line("railway", "鉄道"),
            ]
            .into_iter()
            .collect(),
        )
    }
}
