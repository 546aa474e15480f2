use crate::error::MarketError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

const INTERNAL_ERROR: &str = "Internal server error";

impl MarketError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::Unavailable(_)
            | Self::Signature(_)
            | Self::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Renders `{"error": "<message>"}`.
///
/// Caller errors carry their message verbatim. Upstream errors are logged
/// with their detail and the client only sees a generic message.
impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_upstream() {
            error!(error = %self, "Request failed");
            INTERNAL_ERROR.to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
