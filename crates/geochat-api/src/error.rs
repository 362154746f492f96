use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geochat_core::GeochatError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<GeochatError> for ApiError {
    fn from(err: GeochatError) -> Self {
        let details = err.to_string();
        let error = match &err {
            GeochatError::DatasetNotFound { .. } => Self::not_found("Dataset not found"),
            GeochatError::FeatureLoad { .. } | GeochatError::SchemaUnavailable { .. } => {
                Self::not_found("Dataset file not available")
            }
            GeochatError::UnknownDataType { .. } | GeochatError::InvalidFeatureCollection { .. } => {
                Self::bad_request("Invalid request")
            }
            GeochatError::ConfigMissing { .. } => Self::unauthorized("API key is not configured"),
            GeochatError::Llm { .. } | GeochatError::MalformedResponse { .. } => {
                Self::service_unavailable("Could not get a response from the chatbot")
            }
            GeochatError::Maps { .. } => Self::service_unavailable("Maps provider call failed"),
            _ => Self::internal("Internal error"),
        };

        if error.status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }
        error.with_details(details)
    }
}
