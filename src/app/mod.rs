pub mod error;
pub mod report_service;

pub use error::ServiceError;
pub use report_service::ReportService;
