use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Totals per type and status plus the five newest reports", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Records could not be loaded", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> Response {
    match state.report_service.stats().await {
        Ok(stats) => respond(StatusCode::OK, &stats),
        Err(e) => e.into_response(),
    }
}
