pub mod validator;

pub use validator::{is_email, is_phone, validate_report, FieldError};
