use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Property snapshot of one feature or scene entity
pub type PropertyBag = serde_json::Map<String, serde_json::Value>;

/// The value supplied for a single filter field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    /// Substring to look for
    Text(String),
    /// Accepted enum values
    Choices(Vec<String>),
    /// Inclusive numeric bounds
    Range {
        #[serde(default, deserialize_with = "deserialize_bound", skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_bound", skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl CriterionValue {
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        CriterionValue::Range { min, max }
    }

    /// Blank criteria impose no constraint
    pub fn is_blank(&self) -> bool {
        match self {
            CriterionValue::Text(s) => s.trim().is_empty(),
            CriterionValue::Choices(values) => values.is_empty(),
            CriterionValue::Range { min, max } => {
                !min.is_some_and(f64::is_finite) && !max.is_some_and(f64::is_finite)
            }
        }
    }
}

/// Range bounds arrive from form inputs as numbers or numeric strings
fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Filter criteria keyed by `"<dataType>_<fieldKey>"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria(BTreeMap<String, CriterionValue>);

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaced_key(data_type: &str, field_key: &str) -> String {
        format!("{}_{}", data_type, field_key)
    }

    pub fn insert(&mut self, data_type: &str, field_key: &str, value: CriterionValue) {
        self.0.insert(Self::namespaced_key(data_type, field_key), value);
    }

    pub fn insert_raw(&mut self, key: impl Into<String>, value: CriterionValue) {
        self.0.insert(key.into(), value);
    }

    /// Criteria of one dataset type, keyed by bare field key
    pub fn for_type(&self, data_type: &str) -> BTreeMap<&str, &CriterionValue> {
        let prefix = format!("{}_", data_type);
        self.0
            .iter()
            .filter_map(|(key, value)| key.strip_prefix(prefix.as_str()).map(|field| (field, value)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CriterionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, CriterionValue)> for FilterCriteria {
    fn from_iter<I: IntoIterator<Item = (String, CriterionValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
