use serde_json::Value;

use crate::error::{GeochatError, Result};

/// Result of checking a document's FeatureCollection structure
#[derive(Debug, Clone, Default)]
pub struct FeatureCollectionValidation {
    pub errors: Vec<String>,
}

impl FeatureCollectionValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeochatError::InvalidFeatureCollection { reason: self.errors.join("; ") })
        }
    }
}

/// Check that `document` is a FeatureCollection whose features each carry
/// a `Feature` type, a geometry object and a properties object
pub fn validate_feature_collection(document: &Value) -> FeatureCollectionValidation {
    let mut validation = FeatureCollectionValidation::default();

    let Some(object) = document.as_object() else {
        validation.errors.push("GeoJSON must be an object".to_string());
        return validation;
    };

    if object.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        validation.errors.push("type must be FeatureCollection".to_string());
    }

    match object.get("features").and_then(Value::as_array) {
        Some(features) => {
            for (index, feature) in features.iter().enumerate() {
                let feature_errors = validate_feature(feature);
                if !feature_errors.is_empty() {
                    validation
                        .errors
                        .push(format!("Feature {}: {}", index, feature_errors.join(", ")));
                }
            }
        }
        None => validation.errors.push("features must be an array".to_string()),
    }

    validation
}

fn validate_feature(feature: &Value) -> Vec<String> {
    let Some(object) = feature.as_object() else {
        return vec!["feature must be an object".to_string()];
    };

    let mut errors = Vec::new();
    if object.get("type").and_then(Value::as_str) != Some("Feature") {
        errors.push("type must be Feature".to_string());
    }
    if !object.get("geometry").is_some_and(Value::is_object) {
        errors.push("geometry must be an object".to_string());
    }
    if !object.get("properties").is_some_and(Value::is_object) {
        errors.push("properties must be an object".to_string());
    }
    errors
}
