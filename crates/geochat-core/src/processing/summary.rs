use serde_json::Value;

use crate::models::{PropertySummary, SchemaSummary};

/// Features sampled when building a summary
pub const SAMPLE_FEATURES: usize = 100;

/// Distinct sample values kept per property
pub const MAX_SAMPLES: usize = 3;

/// Japanese description of a well-known PLATEAU property key, or the key itself
pub fn property_description(key: &str) -> &str {
    match key {
        "parkName" => "公園名",
        "parkType" => "公園種別",
        "areaInService" => "供用面積",
        "stationName" => "駅名",
        "lineName" => "路線名",
        "operatorType" => "運営者種別",
        "railwayCategory" => "鉄道種別",
        "name" => "名称",
        "address" => "住所",
        "capacity" => "収容人数",
        "facilityType" => "施設種別",
        "disasterCategory" => "災害種別",
        "level" => "レベル",
        "height" => "高さ",
        "municipalityName" => "市区町村名",
        "prefectureName" => "都道府県名",
        other => other,
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

/// Build a schema summary from a parsed FeatureCollection.
///
/// Samples the first [`SAMPLE_FEATURES`] features, skipping null values.
/// `schema_properties` is the schema file's `definitions.Properties.properties`
/// object; its `type`, `description` and `enum` override what was observed.
pub fn summarize_features(document: &Value, schema_properties: Option<&Value>) -> SchemaSummary {
    let features = document.get("features").and_then(Value::as_array);
    let mut summary = SchemaSummary {
        feature_count: features.map_or(0, Vec::len),
        ..Default::default()
    };

    for feature in features.into_iter().flatten().take(SAMPLE_FEATURES) {
        let Some(properties) = feature.get("properties").and_then(Value::as_object) else {
            continue;
        };

        for (key, value) in properties {
            if value.is_null() {
                continue;
            }

            let entry = summary.properties.entry(key.clone()).or_insert_with(|| PropertySummary {
                value_type: value_type_name(value).to_string(),
                description: property_description(key).to_string(),
                samples: Vec::new(),
                enum_values: None,
            });

            if entry.samples.len() < MAX_SAMPLES && !entry.samples.contains(value) {
                entry.samples.push(value.clone());
            }
        }
    }

    if let Some(schema) = schema_properties.and_then(Value::as_object) {
        for (key, info) in summary.properties.iter_mut() {
            let Some(declared) = schema.get(key) else {
                continue;
            };
            if let Some(t) = declared.get("type").and_then(Value::as_str) {
                info.value_type = t.to_string();
            }
            if let Some(d) = declared.get("description").and_then(Value::as_str) {
                info.description = d.to_string();
            }
            if let Some(values) = declared.get("enum").and_then(Value::as_array) {
                info.enum_values = Some(values.clone());
            }
        }
    }

    summary
}
