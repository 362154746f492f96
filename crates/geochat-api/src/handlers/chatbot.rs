use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::dto::{
    GenerateResponseRequest, GenerateResponseResponse, SelectDataRequest, SelectDataResponse,
    SelectedDataInfo,
};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn select_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectDataRequest>,
) -> Result<Json<SelectDataResponse>, ApiError> {
    let pipeline = state.chat_pipeline()?;
    let query = request.query().ok_or_else(|| ApiError::bad_request("user_query is required"))?;

    tracing::info!(query = %query, "Selecting data");
    let outcome = pipeline.select_data(query).await?;

    Ok(Json(SelectDataResponse {
        success: true,
        selected_data: outcome.selected.iter().map(SelectedDataInfo::from).collect(),
        should_display_on_map: outcome.decision.should_display_on_map,
        should_use_google_maps: outcome.decision.should_use_external_maps,
        google_maps_query: outcome.decision.external_query,
        timestamp: Utc::now(),
    }))
}

pub async fn generate_response(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateResponseRequest>,
) -> Result<Json<GenerateResponseResponse>, ApiError> {
    let pipeline = state.chat_pipeline()?;

    let conversation = request.conversation();
    if conversation.is_empty() {
        return Err(ApiError::bad_request("messages must contain at least one valid message"));
    }

    let selected_names = request.selected_names();
    let external_query = request.external_query();
    tracing::info!(
        messages = conversation.len(),
        selected = selected_names.len(),
        external = external_query.is_some(),
        "Generating response"
    );

    let response = pipeline
        .generate_response(&conversation, &selected_names, external_query.as_ref())
        .await?;

    Ok(Json(GenerateResponseResponse { success: true, response, timestamp: Utc::now() }))
}
