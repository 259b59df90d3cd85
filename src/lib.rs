pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ReportService, ServiceError};
pub use domain::model::{AnimalRecord, ReportField, ReportInput, ReportSchema, SchemaRegistry};
pub use domain::query::{AnimalQuery, Stats};
pub use infra::config::AppConfig;
pub use storage::records::{JsonFileStore, MemoryStore, RecordStore, StorageError};
pub use storage::uploads::{UploadError, UploadStore};
