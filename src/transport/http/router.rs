use crate::domain::model::{AnimalRecord, ReportField};
use crate::domain::query::{RecentReport, Stats};
use crate::domain::validate::FieldError;
use crate::transport::http::handlers::{animals, common, health, stats};
use crate::transport::http::types::{ApiResponse, AppState, ReportForm};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Room for multipart framing and text parts on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        animals::list_animals_handler,
        animals::get_animal_handler,
        animals::create_animal_handler,
        animals::update_animal_handler,
        stats::stats_handler
    ),
    components(schemas(
        ApiResponse,
        AnimalRecord,
        ReportForm,
        ReportField,
        FieldError,
        Stats,
        RecentReport
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.upload_store.max_bytes() + FORM_OVERHEAD_BYTES;
    Router::new()
        .route(
            "/health",
            get(health::healthcheck_handler).fallback(common::method_not_allowed),
        )
        .route(
            "/animals",
            get(animals::list_animals_handler)
                .post(animals::create_animal_handler)
                .fallback(common::method_not_allowed),
        )
        .route(
            "/animals/:id",
            get(animals::get_animal_handler)
                .put(animals::update_animal_handler)
                .fallback(common::method_not_allowed),
        )
        .route(
            "/stats",
            get(stats::stats_handler).fallback(common::method_not_allowed),
        )
        .fallback(common::route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}
