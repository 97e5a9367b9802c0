//! Mapping from [`FaqError`] to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::FaqError;

/// Handler error: a [`FaqError`] rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub FaqError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<FaqError> for ApiError {
    fn from(err: FaqError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            FaqError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FaqError::NotFound(_) => StatusCode::NOT_FOUND,
            FaqError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        } else {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
