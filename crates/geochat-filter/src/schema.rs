//! Field descriptors from dataset JSON schemas

use geochat_core::models::{FieldDescriptor, FieldMap, FieldType, TypeMapping};
use geochat_core::ports::SchemaSource;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Places where schema authors put the property definitions
const PROPERTY_LOCATIONS: [&str; 3] = [
    "/definitions/FacilityProperties/properties",
    "/definitions/Properties/properties",
    "/definitions/Welcome/Properties/properties",
];

const DEFINITION_PREFIX: &str = "#/definitions/";

/// Loads and normalizes field descriptors per dataset type
pub struct SchemaRegistry {
    source: Arc<dyn SchemaSource>,
    mapping: Arc<TypeMapping>,
}

impl SchemaRegistry {
    pub fn new(source: Arc<dyn SchemaSource>, mapping: Arc<TypeMapping>) -> Self {
        Self { source, mapping }
    }

    /// Load the fields of every type in `data_types` that has a schema.
    ///
    /// Types without a schema path are skipped. A schema that cannot be
    /// fetched or parsed is logged and its type left out.
    pub async fn load_fields_for_datasets(&self, data_types: &[String]) -> FieldMap {
        let mut field_map = FieldMap::new();

        for data_type in data_types {
            let Some(schema_path) =
                self.mapping.entry_for_type(data_type).and_then(|e| e.schema_path.as_deref())
            else {
                tracing::debug!(data_type = %data_type, "No schema for data type");
                continue;
            };

            match self.source.fetch_schema(schema_path).await {
                Ok(schema) => {
                    let fields = extract_fields(&schema);
                    tracing::debug!(data_type = %data_type, fields = fields.len(), "Loaded schema fields");
                    field_map.insert(data_type.clone(), fields);
                }
                Err(e) => {
                    tracing::warn!(
                        data_type = %data_type,
                        schema_path,
                        error = %e,
                        "Skipping data type with unusable schema"
                    );
                }
            }
        }

        field_map
    }
}

/// Extract field descriptors from a schema document.
///
/// Definitions from all known locations are concatenated; a key seen twice
/// keeps its first definition.
pub fn extract_fields(schema: &Value) -> Vec<FieldDescriptor> {
    let definitions = schema.get("definitions").and_then(Value::as_object);
    let mut seen = HashSet::new();
    let mut fields = Vec::new();

    for location in PROPERTY_LOCATIONS {
        let Some(properties) = schema.pointer(location).and_then(Value::as_object) else {
            continue;
        };

        for (key, definition) in properties {
            if seen.insert(key.clone()) {
                fields.push(describe_field(key, definition, definitions));
            }
        }
    }

    fields
}

fn describe_field(key: &str, definition: &Value, definitions: Option<&Map<String, Value>>) -> FieldDescriptor {
    let declared_type = resolve_type(definition);
    let enum_values = definition
        .get("enum")
        .and_then(Value::as_array)
        .or_else(|| resolve_ref_enum(definition, definitions))
        .map(|values| values.iter().filter_map(enum_value_string).collect());

    FieldDescriptor::new(key, declared_type, enum_values)
}

fn resolve_type(definition: &Value) -> FieldType {
    let declared = match definition.get("type") {
        Some(Value::String(t)) => Some(t.as_str()),
        // `["string", "null"]` style unions
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).find(|t| *t != "null"),
        _ => None,
    };

    match declared {
        Some("number") => FieldType::Number,
        Some("integer") => FieldType::Integer,
        Some("string") if definition.get("format").and_then(Value::as_str) == Some("integer") => {
            FieldType::Integer
        }
        _ => FieldType::String,
    }
}

fn resolve_ref_enum<'a>(
    definition: &Value,
    definitions: Option<&'a Map<String, Value>>,
) -> Option<&'a Vec<Value>> {
    let reference = definition.get("$ref").and_then(Value::as_str)?;
    let name = reference.strip_prefix(DEFINITION_PREFIX)?;
    definitions?.get(name)?.get("enum").and_then(Value::as_array)
}

fn enum_value_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
