//! HTTP mapping for the error taxonomy: 404 for missing records, 400 for
//! everything the client can fix (validation, dangling references,
//! uniqueness conflicts).

use crate::domain::error::ApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(status = %status, error = %self, "request rejected");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
