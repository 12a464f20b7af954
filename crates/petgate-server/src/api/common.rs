// JSON error body for the ungated handlers
// Decision: Same `{"error": ...}` shape as auth rejections, so clients parse one format

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Client-facing error with the status it is sent under
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// What the client got wrong
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ErrorResponse {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
