use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GeochatError;

/// Kind of data a catalog entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    Point,
    MultiLineString,
    #[serde(rename = "3DTiles")]
    Tiles3D,
    #[serde(rename = "OSM")]
    Osm,
}

impl DataType {
    pub const ALL: [DataType; 4] =
        [DataType::Point, DataType::MultiLineString, DataType::Tiles3D, DataType::Osm];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Point => "Point",
            DataType::MultiLineString => "MultiLineString",
            DataType::Tiles3D => "3DTiles",
            DataType::Osm => "OSM",
        }
    }

    /// Japanese label shown in the catalog listing
    pub fn display_name(&self) -> &'static str {
        match self {
            DataType::Point => "ポイントデータ",
            DataType::MultiLineString => "ラインデータ",
            DataType::Tiles3D => "3Dタイル",
            DataType::Osm => "OSM建物",
        }
    }

    /// Catalog ordering; points first, then lines
    pub fn display_order(&self) -> i32 {
        match self {
            DataType::Point => 0,
            DataType::MultiLineString => 1,
            DataType::Tiles3D => 2,
            DataType::Osm => 3,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = GeochatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GeochatError::UnknownDataType { value: s.to_string() })
    }
}

/// Summary of one property observed in a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    /// Observed value type (`string`, `integer`, `float`, ...) unless the
    /// schema file declares one
    #[serde(rename = "type")]
    pub value_type: String,

    /// Human-readable description
    pub description: String,

    /// Up to three distinct non-null sample values
    #[serde(default)]
    pub samples: Vec<serde_json::Value>,

    /// Allowed values, when the schema file lists them
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

/// Schema summary attached to each catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSummary {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySummary>,

    #[serde(default)]
    pub feature_count: usize,
}

impl SchemaSummary {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A catalog entry for one geospatial dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique name, the file stem of the dataset
    pub name: String,

    pub data_type: DataType,

    /// Path relative to the data root, e.g. `data/geoJSON/Point/park.geojson`
    pub file_path: String,

    pub visible: bool,

    pub display_order: i32,

    #[serde(default)]
    pub schema_summary: SchemaSummary,

    /// When the entry was last scanned
    pub scanned_at: DateTime<Utc>,
}

impl Dataset {
    /// URL under which the dataset is served, as used by the type mapping
    pub fn url(&self) -> String {
        if self.file_path.starts_with('/') {
            self.file_path.clone()
        } else {
            format!("/{}", self.file_path)
        }
    }

    /// Number of features recorded in the schema summary
    pub fn feature_count(&self) -> usize {
        self.schema_summary.feature_count
    }
}

/// Aggregate counts over the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub visible: usize,
    pub hidden: usize,
    pub by_type: BTreeMap<DataType, usize>,
}

impl CatalogStats {
    pub fn from_datasets(datasets: &[Dataset]) -> Self {
        let mut stats = CatalogStats { total: datasets.len(), ..Default::default() };
        for dataset in datasets {
            if dataset.visible {
                stats.visible += 1;
            } else {
                stats.hidden += 1;
            }
            *stats.by_type.entry(dataset.data_type).or_insert(0) += 1;
        }
        stats
    }
}
