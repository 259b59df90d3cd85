use crate::domain::validate::FieldError;
use crate::storage::records::StorageError;
use crate::storage::uploads::UploadError;
use thiserror::Error;

/// Failures of a report operation, each mapping to one response category.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Animal report '{id}' not found")]
    NotFound { id: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("{0}")]
    BadRequest(String),
}

impl ServiceError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}
