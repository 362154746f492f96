use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::{ApplyFiltersRequest, ClearFiltersRequest, FieldsQuery, FieldsResponse, FilterResponse};
use crate::error::ApiError;
use crate::services::FilterRunService;
use crate::state::AppState;

pub async fn filter_fields(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<FieldsResponse>, ApiError> {
    let data_types = query.data_types();
    if data_types.is_empty() {
        return Err(ApiError::bad_request("types is required"));
    }

    let fields = state.filters.fields_for_types(&data_types).await;
    Ok(Json(FieldsResponse { success: true, fields }))
}

pub async fn apply_filters(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ApplyFiltersRequest>,
) -> Result<Json<FilterResponse>, ApiError> {
    tracing::info!(urls = request.urls.len(), criteria = request.criteria.len(), "Applying filters");

    let (report, features) = FilterRunService::apply(&state, request.urls, request.criteria).await;
    Ok(Json(FilterResponse { success: true, report, features }))
}

pub async fn clear_filters(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClearFiltersRequest>,
) -> Result<Json<FilterResponse>, ApiError> {
    tracing::info!(urls = request.urls.len(), "Clearing filters");

    let (report, features) = FilterRunService::clear(&state, request.urls).await;
    Ok(Json(FilterResponse { success: true, report, features }))
}
