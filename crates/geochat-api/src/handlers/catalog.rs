use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use geochat_core::models::{CatalogStats, DataType, Dataset};

use crate::dto::{
    CatalogStatisticsResponse, DataTypeOption, DataTypeStats, DatasetDetailResponse,
    DatasetListMeta, DatasetListQuery, DatasetListResponse, DatasetView, RescanResponse,
};
use crate::error::ApiError;
use crate::services::CatalogService;
use crate::state::AppState;

pub async fn list_datasets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatasetListQuery>,
) -> Result<Json<DatasetListResponse>, ApiError> {
    let data_type = match query.data_type.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => Some(raw.parse::<DataType>()?),
        None => None,
    };
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let datasets = state.catalog.list_datasets().await?;
    let data: Vec<DatasetView> = datasets
        .iter()
        .filter(|d| data_type.map_or(true, |t| d.data_type == t))
        .filter(|d| search.map_or(true, |s| d.name.contains(s)))
        .map(DatasetView::from)
        .collect();

    tracing::debug!(total = data.len(), "Listing datasets");
    Ok(Json(DatasetListResponse {
        meta: DatasetListMeta {
            total: data.len(),
            data_types: DataType::ALL.into_iter().map(DataTypeOption::from).collect(),
        },
        data,
    }))
}

pub async fn show_dataset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<DatasetDetailResponse>, ApiError> {
    let dataset = CatalogService::find(&state, &name).await?;
    let (geojson_content, statistics) = CatalogService::load_content(&state, &dataset).await?;

    Ok(Json(DatasetDetailResponse {
        geo_json_data: DatasetView::from(&dataset),
        schema_summary: dataset.schema_summary,
        geojson_content,
        statistics,
    }))
}

pub async fn catalog_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogStatisticsResponse>, ApiError> {
    let datasets = state.catalog.list_datasets().await?;

    let by_data_type = DataType::ALL
        .into_iter()
        .map(|data_type| {
            let of_type: Vec<&Dataset> = datasets.iter().filter(|d| d.data_type == data_type).collect();
            DataTypeStats {
                value: data_type,
                display_name: data_type.display_name(),
                total: of_type.len(),
                visible: of_type.iter().filter(|d| d.visible).count(),
            }
        })
        .collect();

    Ok(Json(CatalogStatisticsResponse { overall: CatalogStats::from_datasets(&datasets), by_data_type }))
}

pub async fn rescan_catalog(State(state): State<Arc<AppState>>) -> Result<Json<RescanResponse>, ApiError> {
    let total = CatalogService::rescan(&state).await?;
    Ok(Json(RescanResponse { success: true, total, message: format!("Scanned {} datasets", total) }))
}
