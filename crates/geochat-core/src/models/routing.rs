use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of external maps lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalQueryKind {
    /// Free-text place search
    Places,
    /// Address lookup
    Geocode,
    /// Route between two places
    Directions,
}

impl ExternalQueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalQueryKind::Places => "places",
            ExternalQueryKind::Geocode => "geocode",
            ExternalQueryKind::Directions => "directions",
        }
    }
}

impl fmt::Display for ExternalQueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra parameters of an external query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// A query for the external maps provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalQuery {
    #[serde(rename = "type")]
    pub kind: ExternalQueryKind,

    pub query: String,

    #[serde(default)]
    pub params: ExternalQueryParams,
}

impl ExternalQuery {
    pub fn places(query: impl Into<String>) -> Self {
        Self { kind: ExternalQueryKind::Places, query: query.into(), params: Default::default() }
    }
}

/// Outcome of routing a user query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub should_display_on_map: bool,
    pub should_use_external_maps: bool,
    pub external_query: Option<ExternalQuery>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_external_query_wire_format() {
        let query: ExternalQuery = serde_json::from_value(json!({
            "type": "directions",
            "query": "千葉駅から幕張メッセ",
            "params": {"origin": "千葉駅", "destination": "幕張メッセ"}
        }))
        .unwrap();

        assert_eq!(query.kind, ExternalQueryKind::Directions);
        assert_eq!(query.params.destination.as_deref(), Some("幕張メッセ"));

        let places: ExternalQuery =
            serde_json::from_value(json!({"type": "places", "query": "カフェ"})).unwrap();
        assert_eq!(places, ExternalQuery::places("カフェ"));
        assert_eq!(serde_json::to_value(&places).unwrap()["type"], "places");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<ExternalQuery, _> =
            serde_json::from_value(json!({"type": "weather", "query": "x"}));
        assert!(result.is_err());
    }
}
