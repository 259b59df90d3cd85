use crate::app::ReportService;
use crate::domain::model::SchemaRegistry;
use crate::domain::validate::FieldError;
use crate::infra::config::AppConfig;
use crate::storage::records::JsonFileStore;
use crate::storage::uploads::UploadStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportService>,
    pub upload_store: Arc<UploadStore>,
}

impl AppState {
    /// Wires the JSON file store, the configured schema and the upload directory.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let schema = SchemaRegistry::with_presets()
            .resolve(&config.schema_name, config.schema_file.as_deref())?;
        let store = Arc::new(JsonFileStore::new(&config.data_file));
        Ok(Self {
            report_service: Arc::new(ReportService::new(store, schema)),
            upload_store: Arc::new(UploadStore::new(&config.upload_dir, config.max_upload_bytes)),
        })
    }
}

/// Uniform response envelope.
///
/// Success: `{success: true, data, total?}`. Failure: `{success: false, message, error?, errors?}`.
#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            total: None,
            message: None,
            error: None,
            errors: None,
        }
    }

    pub fn ok_list(data: JsonValue, total: usize) -> Self {
        Self {
            total: Some(total),
            ..Self::ok(data)
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            total: None,
            message: Some(message.into()),
            error: None,
            errors: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Writable report fields as accepted by POST/PUT (`application/json` or `multipart/form-data`).
///
/// Multipart bodies carry the same names as text parts plus an optional `image` file part.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ReportForm {
    #[serde(rename = "type")]
    #[schema(example = "dog")]
    pub animal_type: String,
    #[schema(example = "found")]
    pub status: Option<String>,
    #[schema(example = "Corner of 5th and Main")]
    pub location: String,
    pub description: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub age: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}
