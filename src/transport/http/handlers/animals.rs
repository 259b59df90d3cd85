use crate::app::ServiceError;
use crate::domain::query::AnimalQuery;
use crate::transport::http::handlers::common::{respond, respond_list};
use crate::transport::http::handlers::submission::ReportSubmission;
use crate::transport::http::types::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[utoipa::path(
    get,
    path = "/animals",
    params(AnimalQuery),
    responses(
        (status = 200, description = "Matching reports, newest first, with `total`", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Malformed query string", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Records could not be loaded", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn list_animals_handler(
    State(state): State<AppState>,
    query: Result<Query<AnimalQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => {
            return ServiceError::BadRequest(format!("Invalid query string: {}", e)).into_response();
        }
    };

    match state.report_service.list(&query).await {
        Ok(records) => respond_list(&records),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/animals/{id}",
    params(
        ("id" = String, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "The report", body = crate::transport::http::types::ApiResponse),
        (status = 404, description = "No report with this id", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Records could not be loaded", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn get_animal_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.report_service.get(&id).await {
        Ok(record) => respond(StatusCode::OK, &record),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/animals",
    request_body(
        content = crate::transport::http::types::ReportForm,
        description = "Report fields as JSON, or as multipart/form-data with an optional `image` part (max 5 MB; jpeg, png, gif, webp)",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 201, description = "Report created", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Validation failed, malformed body or rejected image", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Records could not be saved", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn create_animal_handler(
    State(state): State<AppState>,
    submission: ReportSubmission,
) -> Response {
    let ReportSubmission { input, upload } = submission;
    match state.report_service.create(input, upload).await {
        Ok(record) => respond(StatusCode::CREATED, &record),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/animals/{id}",
    params(
        ("id" = String, Path, description = "Report id")
    ),
    request_body(
        content = crate::transport::http::types::ReportForm,
        description = "Full replacement of the writable fields; `imageRef` changes only when an `image` part is attached",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Report updated", body = crate::transport::http::types::ApiResponse),
        (status = 400, description = "Validation failed, malformed body or rejected image", body = crate::transport::http::types::ApiResponse),
        (status = 404, description = "No report with this id", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Records could not be saved", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn update_animal_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    submission: ReportSubmission,
) -> Response {
    let ReportSubmission { input, upload } = submission;
    match state.report_service.update(&id, input, upload).await {
        Ok(record) => respond(StatusCode::OK, &record),
        Err(e) => e.into_response(),
    }
}
