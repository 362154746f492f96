use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Geographic extent of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn extend(self, rect: geo::Rect<f64>) -> Self {
        Self {
            min_lng: self.min_lng.min(rect.min().x),
            max_lng: self.max_lng.max(rect.max().x),
            min_lat: self.min_lat.min(rect.min().y),
            max_lat: self.max_lat.max(rect.max().y),
        }
    }
}

impl From<geo::Rect<f64>> for Bounds {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self {
            min_lng: rect.min().x,
            max_lng: rect.max().x,
            min_lat: rect.min().y,
            max_lat: rect.max().y,
        }
    }
}

/// Summary statistics of a FeatureCollection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_features: usize,
    /// Distinct geometry types in first-seen order
    pub geometry_types: Vec<String>,
    /// Distinct property keys in first-seen order
    pub property_keys: Vec<String>,
    pub bounds: Option<Bounds>,
}

/// Compute statistics for a parsed GeoJSON document.
///
/// Features whose geometry cannot be converted are counted but contribute
/// no bounds.
pub fn compute_statistics(document: &Value) -> DatasetStatistics {
    let Some(features) = document.get("features").and_then(Value::as_array) else {
        return DatasetStatistics::default();
    };

    let mut stats = DatasetStatistics { total_features: features.len(), ..Default::default() };
    let mut seen_types = BTreeSet::new();
    let mut seen_keys = BTreeSet::new();

    for feature in features {
        if let Some(geometry_type) = feature.pointer("/geometry/type").and_then(Value::as_str) {
            if seen_types.insert(geometry_type.to_string()) {
                stats.geometry_types.push(geometry_type.to_string());
            }
        }

        if let Some(properties) = feature.get("properties").and_then(Value::as_object) {
            for key in properties.keys() {
                if seen_keys.insert(key.clone()) {
                    stats.property_keys.push(key.clone());
                }
            }
        }

        if let Some(rect) = feature.get("geometry").and_then(geometry_rect) {
            stats.bounds = Some(match stats.bounds {
                Some(bounds) => bounds.extend(rect),
                None => Bounds::from(rect),
            });
        }
    }

    stats
}

fn geometry_rect(value: &Value) -> Option<geo::Rect<f64>> {
    let geometry = geojson::Geometry::from_json_value(value.clone()).ok()?;
    let geometry = geo::Geometry::<f64>::try_from(geometry).ok()?;
    geometry.bounding_rect()
}
