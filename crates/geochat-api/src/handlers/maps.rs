use std::sync::Arc;

use axum::{extract::State, Json};
use geochat_core::models::ExternalQuery;

use crate::dto::{MapsMetadata, MapsSearchResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn maps_search(
    State(state): State<Arc<AppState>>,
    Json(query): Json<ExternalQuery>,
) -> Result<Json<MapsSearchResponse>, ApiError> {
    let provider = state.maps_provider()?;
    if query.query.trim().is_empty() {
        return Err(ApiError::bad_request("query is required"));
    }

    tracing::info!(kind = %query.kind, query = %query.query, "Searching external maps");
    let geojson = provider.search(&query).await?;

    let metadata = MapsMetadata {
        provider: provider.provider_name().to_string(),
        kind: query.kind.to_string(),
        query: query.query.clone(),
        feature_count: geojson.features.len(),
    };
    Ok(Json(MapsSearchResponse { success: true, geojson, metadata }))
}
