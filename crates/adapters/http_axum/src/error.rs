//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smartheat_domain::error::SmartHeatError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SmartHeatError`] to an HTTP response with appropriate status code.
pub struct ApiError(SmartHeatError);

impl From<SmartHeatError> for ApiError {
    fn from(err: SmartHeatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SmartHeatError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SmartHeatError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            // HeatingSupervisor logs relay failures; reserved for other HeatingControl impls
            SmartHeatError::Actuation(err) => {
                tracing::error!(error = %err, "actuation error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            SmartHeatError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
