use crate::domain::model::{Check, ReportField, ReportInput, ReportSchema, ValidReport};
use serde::Serialize;
use utoipa::ToSchema;

/// One violated constraint. Every violation of a request is reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: ReportField,
    pub message: String,
}

impl FieldError {
    fn new(field: ReportField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates submitted report data against a schema.
///
/// Returns the normalized report, or every [`FieldError`] found (not fail-fast).
pub fn validate_report(input: &ReportInput, schema: &ReportSchema) -> Result<ValidReport, Vec<FieldError>> {
    let mut errors = Vec::new();

    let animal_type = enumerated(input, ReportField::Type, &schema.types, None, &mut errors);
    let status = enumerated(
        input,
        ReportField::Status,
        &schema.statuses,
        schema.default_status.as_deref(),
        &mut errors,
    );

    let mut text = |field: ReportField| -> Option<String> { checked_text(input, schema, field, &mut errors) };
    let location = text(ReportField::Location);
    let description = text(ReportField::Description);
    let breed = text(ReportField::Breed);
    let color = text(ReportField::Color);
    let size = text(ReportField::Size);
    let age = text(ReportField::Age);
    let contact_name = text(ReportField::ContactName);
    let contact_phone = text(ReportField::ContactPhone);
    let contact_email = text(ReportField::ContactEmail);

    // Fields that are structurally mandatory on a record, whatever the schema says.
    for (field, value) in [
        (ReportField::Location, &location),
        (ReportField::ContactName, &contact_name),
        (ReportField::ContactPhone, &contact_phone),
        (ReportField::ContactEmail, &contact_email),
    ] {
        if value.is_none() && !errors.iter().any(|e| e.field == field) {
            errors.push(FieldError::new(field, format!("{} is required", field)));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    match (animal_type, status, location, contact_name, contact_phone, contact_email) {
        (
            Some(animal_type),
            Some(status),
            Some(location),
            Some(contact_name),
            Some(contact_phone),
            Some(contact_email),
        ) => Ok(ValidReport {
            animal_type,
            status,
            location,
            description,
            breed,
            color,
            size,
            age,
            contact_name,
            contact_phone,
            contact_email,
        }),
        // Every `None` above has already pushed an error.
        _ => Err(errors),
    }
}

fn trimmed(input: &ReportInput, field: ReportField) -> Option<&str> {
    input.get(field).map(str::trim).filter(|v| !v.is_empty())
}

fn enumerated(
    input: &ReportInput,
    field: ReportField,
    allowed: &[String],
    default: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = match trimmed(input, field) {
        Some(v) => v,
        None => match default {
            Some(d) => return Some(d.to_string()),
            None => {
                errors.push(FieldError::new(field, format!("{} is required", field)));
                return None;
            }
        },
    };
    match canonical(value, allowed) {
        Some(v) => Some(v),
        None => {
            errors.push(FieldError::new(
                field,
                format!("{} must be one of: {}", field, allowed.join(", ")),
            ));
            None
        }
    }
}

fn canonical(value: &str, allowed: &[String]) -> Option<String> {
    allowed.iter().find(|a| a.eq_ignore_ascii_case(value)).cloned()
}

fn checked_text(
    input: &ReportInput,
    schema: &ReportSchema,
    field: ReportField,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = match trimmed(input, field) {
        Some(v) => v,
        None => {
            if schema.is_required(field) {
                errors.push(FieldError::new(field, format!("{} is required", field)));
            }
            return None;
        }
    };

    let mut out = value.to_string();
    let len = value.chars().count();
    for check in schema.checks_for(field) {
        let failure = match check {
            Check::Required => None,
            Check::OneOf { values } => match canonical(value, values) {
                Some(v) => {
                    out = v;
                    None
                }
                None => Some(format!("{} must be one of: {}", field, values.join(", "))),
            },
            Check::MinLen { min } if len < *min => {
                Some(format!("{} must be at least {} characters", field, min))
            }
            Check::MaxLen { max } if len > *max => {
                Some(format!("{} must be at most {} characters", field, max))
            }
            Check::MinLen { .. } | Check::MaxLen { .. } => None,
            Check::Phone if !is_phone(value) => Some(format!("{} must be a valid phone number", field)),
            Check::Email if !is_email(value) => Some(format!("{} must be a valid email address", field)),
            Check::Phone | Check::Email => None,
        };
        if let Some(message) = failure {
            errors.push(FieldError::new(field, message));
        }
    }
    Some(out)
}

/// Digits, spaces and `+-().` only, with at least seven digits.
pub fn is_phone(value: &str) -> bool {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
    allowed && value.chars().filter(char::is_ascii_digit).count() >= 7
}

/// Syntactic check only: `local@domain.tld`, no whitespace, single `@`.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty() && !l.starts_with('-') && !l.ends_with('-'))
        && labels.last().map_or(false, |tld| tld.len() >= 2)
}
