use geochat_core::models::{ExternalQuery, FilterCriteria, Message, Role};
use serde::Deserialize;
use serde_json::Value;

/// Select-data request
#[derive(Debug, Deserialize)]
pub struct SelectDataRequest {
    #[serde(default)]
    pub user_query: Option<String>,
}

impl SelectDataRequest {
    /// Trimmed query, `None` when missing or blank
    pub fn query(&self) -> Option<&str> {
        self.user_query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Reference to a dataset chosen by an earlier select-data turn
#[derive(Debug, Deserialize)]
pub struct SelectedDataRef {
    pub name: String,
}

/// Generate-response request
///
/// Messages and the maps query are kept as raw JSON and parsed leniently:
/// malformed messages are dropped and an unparseable maps query is ignored.
#[derive(Debug, Deserialize)]
pub struct GenerateResponseRequest {
    #[serde(default)]
    pub messages: Vec<Value>,

    #[serde(default)]
    pub selected_data: Vec<SelectedDataRef>,

    #[serde(default)]
    pub google_maps_query: Option<Value>,
}

impl GenerateResponseRequest {
    /// Messages with a known role and non-blank content, in order
    pub fn conversation(&self) -> Vec<Message> {
        self.messages.iter().filter_map(parse_message).collect()
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.selected_data.iter().map(|d| d.name.clone()).collect()
    }

    pub fn external_query(&self) -> Option<ExternalQuery> {
        let raw = self.google_maps_query.as_ref().filter(|v| !v.is_null())?;
        match serde_json::from_value::<ExternalQuery>(raw.clone()) {
            Ok(query) if !query.query.trim().is_empty() => Some(query),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed google_maps_query");
                None
            }
        }
    }
}

fn parse_message(value: &Value) -> Option<Message> {
    let content = value.get("content").and_then(Value::as_str).filter(|c| !c.trim().is_empty())?;
    let role = match value.get("role").and_then(Value::as_str)? {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        "system" => Role::System,
        _ => return None,
    };
    Some(Message { role, content: content.to_string() })
}

/// Catalog listing query string
#[derive(Debug, Default, Deserialize)]
pub struct DatasetListQuery {
    pub data_type: Option<String>,
    pub search: Option<String>,
}

/// `?types=park,shelter`
#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    pub types: Option<String>,
}

impl FieldsQuery {
    pub fn data_types(&self) -> Vec<String> {
        self.types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Filter apply request
#[derive(Debug, Deserialize)]
pub struct ApplyFiltersRequest {
    pub urls: Vec<String>,

    #[serde(default)]
    pub criteria: FilterCriteria,
}

/// Filter clear request
#[derive(Debug, Deserialize)]
pub struct ClearFiltersRequest {
    pub urls: Vec<String>,
}
