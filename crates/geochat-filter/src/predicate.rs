//! Compile filter criteria into per-type predicates

use geochat_core::models::{CriterionValue, FieldDescriptor, FieldKind, FieldMap, FilterCriteria, PropertyBag};
use serde_json::Value;
use std::collections::BTreeMap;

/// One constrained field
#[derive(Debug, Clone, PartialEq)]
enum FieldCheck {
    /// Property's string form must equal one of the choices
    OneOf { key: String, choices: Vec<String> },
    /// Property's string form must contain the needle
    Contains { key: String, needle: String },
    /// Property coerced to a finite number must lie within the bounds
    Within { key: String, min: Option<f64>, max: Option<f64> },
}

impl FieldCheck {
    fn passes(&self, properties: &PropertyBag) -> bool {
        match self {
            FieldCheck::OneOf { key, choices } => match properties
                .get(key)
                .filter(|v| !v.is_null())
                .and_then(scalar_string)
            {
                Some(value) => choices.iter().any(|c| *c == value),
                None => false,
            },
            FieldCheck::Contains { key, needle } => {
                properties.get(key).and_then(scalar_string).unwrap_or_default().contains(needle.as_str())
            }
            FieldCheck::Within { key, min, max } => {
                let Some(value) = properties.get(key).and_then(coerce_number) else {
                    return false;
                };
                min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
            }
        }
    }
}

/// Compiled test over a feature's properties; every check must pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    checks: Vec<FieldCheck>,
}

impl Predicate {
    /// Predicate accepting every feature
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn evaluate(&self, properties: &PropertyBag) -> bool {
        self.checks.iter().all(|check| check.passes(properties))
    }

    /// Number of constrained fields
    pub fn constraint_count(&self) -> usize {
        self.checks.len()
    }
}

/// String form of a scalar; `null` reads as the empty string
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Numbers pass through; numeric strings are parsed; anything else fails.
///
/// Stricter than JavaScript's `Number()`, which reads `null`, `""` and
/// `false` as 0: here those never satisfy a range.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn compile_field(field: &FieldDescriptor, criterion: &CriterionValue) -> Option<FieldCheck> {
    if criterion.is_blank() {
        return None;
    }

    let key = field.key.clone();
    match (&field.kind, criterion) {
        (FieldKind::Enum(_), CriterionValue::Choices(choices)) => {
            Some(FieldCheck::OneOf { key, choices: choices.clone() })
        }
        (FieldKind::Text, CriterionValue::Text(text)) => {
            Some(FieldCheck::Contains { key, needle: text.trim().to_string() })
        }
        (FieldKind::Number, CriterionValue::Range { min, max }) => Some(FieldCheck::Within {
            key,
            min: min.filter(|v| v.is_finite()),
            max: max.filter(|v| v.is_finite()),
        }),
        (kind, criterion) => {
            tracing::warn!(
                field = %field.key,
                kind = ?kind,
                criterion = ?criterion,
                "Criterion shape does not match field kind; ignoring"
            );
            None
        }
    }
}

/// Compile `criteria` into one predicate per type of `field_map`
pub fn compile(criteria: &FilterCriteria, field_map: &FieldMap) -> BTreeMap<String, Predicate> {
    field_map
        .iter()
        .map(|(data_type, fields)| {
            let view = criteria.for_type(data_type);
            let checks = fields
                .iter()
                .filter_map(|field| {
                    view.get(field.key.as_str()).and_then(|criterion| compile_field(field, criterion))
                })
                .collect();
            (data_type.to_string(), Predicate { checks })
        })
        .collect()
}
