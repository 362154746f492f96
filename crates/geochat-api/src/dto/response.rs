use chrono::{DateTime, Utc};
use geochat_core::models::{CatalogStats, DataType, Dataset, ExternalQuery, FieldMap, SchemaSummary};
use geochat_core::processing::DatasetStatistics;
use geochat_filter::ExecutionReport;
use geojson::FeatureCollection;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "geochat-api" }
    }
}

/// A dataset chosen for the current question
#[derive(Debug, Serialize)]
pub struct SelectedDataInfo {
    pub name: String,
    pub data_type: DataType,
    pub schema_summary: SchemaSummary,
}

impl From<&Dataset> for SelectedDataInfo {
    fn from(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            data_type: dataset.data_type,
            schema_summary: dataset.schema_summary.clone(),
        }
    }
}

/// Select-data response
#[derive(Debug, Serialize)]
pub struct SelectDataResponse {
    pub success: bool,
    pub selected_data: Vec<SelectedDataInfo>,
    pub should_display_on_map: bool,
    pub should_use_google_maps: bool,
    pub google_maps_query: Option<ExternalQuery>,
    pub timestamp: DateTime<Utc>,
}

/// Generate-response response
#[derive(Debug, Serialize)]
pub struct GenerateResponseResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Catalog entry as listed by the API
#[derive(Debug, Serialize)]
pub struct DatasetView {
    pub name: String,
    pub data_type: DataType,
    pub data_type_display: &'static str,
    pub url: String,
    pub file_path: String,
    pub visible: bool,
    pub display_order: i32,
    pub feature_count: usize,
    pub scanned_at: DateTime<Utc>,
}

impl From<&Dataset> for DatasetView {
    fn from(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            data_type: dataset.data_type,
            data_type_display: dataset.data_type.display_name(),
            url: dataset.url(),
            file_path: dataset.file_path.clone(),
            visible: dataset.visible,
            display_order: dataset.display_order,
            feature_count: dataset.feature_count(),
            scanned_at: dataset.scanned_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataTypeOption {
    pub value: DataType,
    pub display_name: &'static str,
}

impl From<DataType> for DataTypeOption {
    fn from(data_type: DataType) -> Self {
        Self { value: data_type, display_name: data_type.display_name() }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetListMeta {
    pub total: usize,
    pub data_types: Vec<DataTypeOption>,
}

/// Catalog listing response
#[derive(Debug, Serialize)]
pub struct DatasetListResponse {
    pub data: Vec<DatasetView>,
    pub meta: DatasetListMeta,
}

/// One dataset with its GeoJSON content
#[derive(Debug, Serialize)]
pub struct DatasetDetailResponse {
    pub geo_json_data: DatasetView,
    pub schema_summary: SchemaSummary,
    pub geojson_content: Value,
    pub statistics: DatasetStatistics,
}

#[derive(Debug, Serialize)]
pub struct DataTypeStats {
    pub value: DataType,
    pub display_name: &'static str,
    pub total: usize,
    pub visible: usize,
}

/// Catalog statistics response
#[derive(Debug, Serialize)]
pub struct CatalogStatisticsResponse {
    pub overall: CatalogStats,
    pub by_data_type: Vec<DataTypeStats>,
}

/// Rescan response
#[derive(Debug, Serialize)]
pub struct RescanResponse {
    pub success: bool,
    pub total: usize,
    pub message: String,
}

/// Merged field map of the requested types
#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub success: bool,
    pub fields: FieldMap,
}

/// Outcome of a filter apply or clear
#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub success: bool,
    pub report: ExecutionReport,
    /// Features left visible, per filtered URL
    pub features: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct MapsMetadata {
    pub provider: String,
    pub kind: String,
    pub query: String,
    pub feature_count: usize,
}

/// External maps search response
#[derive(Debug, Serialize)]
pub struct MapsSearchResponse {
    pub success: bool,
    pub geojson: FeatureCollection,
    pub metadata: MapsMetadata,
}
