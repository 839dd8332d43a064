/**
 * Error Conversion
 *
 * `BackendError` converts into an HTTP response so handlers can return it
 * directly. The body is JSON:
 *
 * ```json
 * {
 *   "error": "board not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if let BackendError::StorageFailure(err) = &self {
            tracing::error!("[Error] Storage failure surfaced to client: {}", err);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
