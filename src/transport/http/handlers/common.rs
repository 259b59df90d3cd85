use crate::app::ServiceError;
use crate::transport::http::types::ApiResponse;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Serializes `data` into a success envelope with the given status.
pub fn respond<T: Serialize>(status: StatusCode, data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (status, Json(ApiResponse::ok(value))).into_response(),
        Err(e) => internal_error(format!("failed to encode response: {}", e)),
    }
}

/// Success envelope carrying a list and its length.
pub fn respond_list<T: Serialize>(items: &[T]) -> Response {
    match serde_json::to_value(items) {
        Ok(value) => (StatusCode::OK, Json(ApiResponse::ok_list(value, items.len()))).into_response(),
        Err(e) => internal_error(format!("failed to encode response: {}", e)),
    }
}

fn internal_error(detail: String) -> Response {
    tracing::error!(error = %detail, "Internal error while building response");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure("Internal server error")),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("Validation failed").with_errors(errors)),
            )
                .into_response(),
            ServiceError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::failure(self.to_string())),
            )
                .into_response(),
            ServiceError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(message)),
            )
                .into_response(),
            ServiceError::Upload(e) if e.is_client_error() => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("Image upload rejected").with_error(e.to_string())),
            )
                .into_response(),
            ServiceError::Upload(e) => {
                // Details stay in the log; the client gets a generic message.
                tracing::error!(error = %e, "Failed to store upload");
                storage_failure()
            }
            ServiceError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                storage_failure()
            }
        }
    }
}

fn storage_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure("Internal server error").with_error("Animal records are temporarily unavailable")),
    )
        .into_response()
}

/// Fallback for requests no route matches.
pub async fn route_not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "Unrouted request");
    (StatusCode::NOT_FOUND, Json(ApiResponse::failure("Route not found")))
}

/// Known path, unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::debug!(%method, path = %uri.path(), "Method not allowed");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::failure("Method not allowed")),
    )
}
