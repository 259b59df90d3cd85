//! Request body extraction for report writes.
//!
//! POST/PUT accept either a JSON object of report fields or a multipart form whose text
//! parts carry the same fields and whose `image` part carries an optional photo. The photo
//! is streamed straight into the upload store under its size and type limits.

use crate::app::ServiceError;
use crate::domain::model::{ReportField, ReportInput};
use crate::storage::uploads::{PendingUpload, UploadStore};
use crate::transport::http::types::AppState;
use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use tracing::debug;

/// Name of the multipart part holding the photo.
pub const IMAGE_FIELD: &str = "image";

pub struct ReportSubmission {
    pub input: ReportInput,
    pub upload: Option<PendingUpload>,
}

#[async_trait]
impl FromRequest<AppState> for ReportSubmission {
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |v| v.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ServiceError::BadRequest(format!("Invalid multipart body: {}", e)))?;
            read_multipart(multipart, &state.upload_store).await
        } else {
            let Json(input) = Json::<ReportInput>::from_request(req, state)
                .await
                .map_err(|e| {
                    ServiceError::BadRequest(format!(
                        "Invalid JSON body: {} (expected an object of report fields)",
                        e
                    ))
                })?;
            Ok(Self { input, upload: None })
        }
    }
}

async fn read_multipart(mut multipart: Multipart, uploads: &UploadStore) -> Result<ReportSubmission, ServiceError> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        ServiceError::BadRequest(format!("Invalid multipart body: {}", e))
    };

    let mut input = ReportInput::default();
    let mut upload: Option<PendingUpload> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            // Browsers send an empty, nameless part when no file was picked.
            if filename.is_empty() {
                continue;
            }
            if upload.is_some() {
                return Err(ServiceError::BadRequest("Only one image may be attached".to_string()));
            }
            let content_type = field.content_type().map(str::to_string);
            let mut writer = uploads.begin(&filename, content_type.as_deref()).await?;
            while let Some(chunk) = field.chunk().await.map_err(malformed)? {
                writer.write_chunk(&chunk).await?;
            }
            upload = Some(writer.finish().await?);
            continue;
        }

        match ReportField::from_wire(&name) {
            Some(report_field) => {
                let value = field.text().await.map_err(malformed)?;
                input.set(report_field, value);
            }
            None => debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok(ReportSubmission { input, upload })
}
