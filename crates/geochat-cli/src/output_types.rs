use geochat_core::config::ConfigSource;
use geochat_core::models::{CatalogStats, Dataset, ExternalQuery, FieldMap};
use geochat_filter::ExecutionReport;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Output for scan command
#[derive(Debug, Serialize)]
pub struct ScanOutput {
    pub data_dir: String,
    pub datasets: Vec<Dataset>,
    pub stats: CatalogStats,
}

/// Output for fields command
#[derive(Debug, Serialize)]
pub struct FieldsOutput {
    pub types: Vec<String>,
    pub fields: FieldMap,
}

/// Output for filter command
#[derive(Debug, Serialize)]
pub struct FilterOutput {
    pub cleared: bool,
    pub report: ExecutionReport,
    pub features: BTreeMap<String, Value>,
}

/// Output for ask command
#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    pub selected_data: Vec<String>,
    pub should_display_on_map: bool,
    pub should_use_google_maps: bool,
    pub google_maps_query: Option<ExternalQuery>,
    pub answer: Option<String>,
    pub maps_results: Option<Value>,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: BTreeMap<String, ConfigEntry>,
    pub credentials: BTreeMap<String, bool>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: ConfigSource,
}
