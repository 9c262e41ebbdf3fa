//! HTTP status mapping for service errors.
//!
//! Converts `DocQaError` values into JSON error responses so
//! handlers can return `Result<Json<T>, DocQaError>` directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::DocQaError;

impl DocQaError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            DocQaError::DocumentNotFound(_) | DocQaError::IndexNotInitialized(_) => {
                StatusCode::NOT_FOUND
            }
            DocQaError::InvalidRequest(_)
            | DocQaError::ExtractionFailed(_)
            | DocQaError::EmptyDocument => StatusCode::BAD_REQUEST,
            DocQaError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            DocQaError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DocQaError::Upstream(_) => StatusCode::BAD_GATEWAY,
            DocQaError::DimensionMismatch { .. }
            | DocQaError::Tokenizer(_)
            | DocQaError::ConfigError(_)
            | DocQaError::StorageError(_)
            | DocQaError::IoError(_)
            | DocQaError::SerdeError(_)
            | DocQaError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for DocQaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
