use crate::utils::error::{ErrorCategory, StockError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler failure: the client sees only `{"error": message}`, the source is logged.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    source: StockError,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str, source: StockError) -> Self {
        Self {
            status,
            message,
            source,
        }
    }

    /// 400 for client mistakes, 500 for everything else.
    pub fn from_error(source: StockError, message: &'static str) -> Self {
        let status = match source.category() {
            ErrorCategory::Client => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, message, source)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                "❌ {} ({:?}): {}",
                self.message,
                self.source.category(),
                self.source
            );
        } else {
            tracing::warn!("{}: {}", self.message, self.source);
        }

        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
