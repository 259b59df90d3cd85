//! Built-in schema variants.

use super::schema::{Check, FieldRule, ReportSchema, SCHEMA_FORMAT_VERSION};
use super::ReportField;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Rules every preset shares: location, contact details, bounded descriptive text.
fn common_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(ReportField::Location, vec![Check::Required, Check::MaxLen { max: 200 }]),
        FieldRule::new(ReportField::Description, vec![Check::MaxLen { max: 500 }]),
        FieldRule::new(ReportField::Breed, vec![Check::MaxLen { max: 50 }]),
        FieldRule::new(ReportField::Color, vec![Check::MaxLen { max: 50 }]),
        FieldRule::new(ReportField::Age, vec![Check::MaxLen { max: 50 }]),
        FieldRule::new(
            ReportField::Size,
            vec![Check::OneOf {
                values: strings(&["small", "medium", "large"]),
            }],
        ),
        FieldRule::new(
            ReportField::ContactName,
            vec![Check::Required, Check::MinLen { min: 2 }, Check::MaxLen { max: 100 }],
        ),
        FieldRule::new(ReportField::ContactPhone, vec![Check::Required, Check::Phone]),
        FieldRule::new(ReportField::ContactEmail, vec![Check::Required, Check::Email]),
    ]
}

/// The default deployment: status defaults to `found`, `age` is required.
pub fn standard() -> ReportSchema {
    let mut rules = common_rules();
    rules.push(FieldRule::new(ReportField::Age, vec![Check::Required]));
    ReportSchema {
        name: "standard".to_string(),
        version: SCHEMA_FORMAT_VERSION,
        types: strings(&["dog", "cat", "other"]),
        statuses: strings(&["found", "lost", "rescued", "adopted"]),
        default_status: Some("found".to_string()),
        rules,
    }
}

/// Community lost-and-found board: explicit status, `size` and `color` required for search.
pub fn community() -> ReportSchema {
    let mut rules = common_rules();
    rules.push(FieldRule::new(ReportField::Size, vec![Check::Required]));
    rules.push(FieldRule::new(ReportField::Color, vec![Check::Required]));
    ReportSchema {
        name: "community".to_string(),
        version: SCHEMA_FORMAT_VERSION,
        types: strings(&["dog", "cat", "bird", "rabbit", "other"]),
        statuses: strings(&["lost", "found", "reunited", "adopted"]),
        default_status: None,
        rules,
    }
}

pub fn all() -> Vec<ReportSchema> {
    vec![standard(), community()]
}
