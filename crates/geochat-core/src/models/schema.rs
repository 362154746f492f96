use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Integer)
    }
}

/// How a field is matched, decided once when the schema is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum FieldKind {
    /// Exact match against one of the allowed values
    Enum(Vec<String>),
    /// Substring match
    Text,
    /// Inclusive numeric range
    Number,
}

/// A filterable field of one dataset type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub declared_type: FieldType,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Build a descriptor, classifying it from its type and enum values
    pub fn new(key: impl Into<String>, declared_type: FieldType, enum_values: Option<Vec<String>>) -> Self {
        let kind = match enum_values {
            Some(values) if !values.is_empty() => FieldKind::Enum(values),
            _ if declared_type.is_numeric() => FieldKind::Number,
            _ => FieldKind::Text,
        };
        Self { key: key.into(), declared_type, kind }
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Enum(values) => Some(values),
            _ => None,
        }
    }
}

/// Fields grouped by dataset type.
///
/// Several types may declare the same key; each keeps its own descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, Vec<FieldDescriptor>>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, data_type: impl Into<String>, fields: Vec<FieldDescriptor>) {
        self.0.insert(data_type.into(), fields);
    }

    pub fn fields_for(&self, data_type: &str) -> Option<&[FieldDescriptor]> {
        self.0.get(data_type).map(Vec::as_slice)
    }

    /// Every `(type, descriptor)` pair declaring `key`
    pub fn fields_by_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (&'a str, &'a FieldDescriptor)> + 'a {
        self.0.iter().flat_map(move |(data_type, fields)| {
            fields.iter().filter(move |f| f.key == key).map(move |f| (data_type.as_str(), f))
        })
    }

    pub fn data_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.0.iter().map(|(t, f)| (t.as_str(), f.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
