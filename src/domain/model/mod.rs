//! Domain model definitions for animal reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub mod presets;
pub mod registry;
pub mod schema;

pub use registry::SchemaRegistry;
pub use schema::{Check, FieldRule, ReportSchema};

/// A single stray-animal sighting as persisted in the record store.
///
/// `id` and `reported_at` are assigned once on creation and never change.
/// `updated_at` is refreshed on every update and is never earlier than `reported_at`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub animal_type: String,
    pub status: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    /// Path of the uploaded photo, e.g. `/uploads/1700000000000-<uuid>.jpg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnimalRecord {
    /// Builds a fresh record from validated input. The caller supplies the id and clock.
    pub fn create(id: String, report: ValidReport, image_ref: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            animal_type: report.animal_type,
            status: report.status,
            location: report.location,
            description: report.description,
            breed: report.breed,
            color: report.color,
            size: report.size,
            age: report.age,
            contact_name: report.contact_name,
            contact_phone: report.contact_phone,
            contact_email: report.contact_email,
            image_ref,
            reported_at: now,
            updated_at: now,
        }
    }

    /// Replaces every writable field. `image_ref` is only replaced when a new upload is given.
    pub fn apply_update(&mut self, report: ValidReport, image_ref: Option<String>, now: DateTime<Utc>) {
        self.animal_type = report.animal_type;
        self.status = report.status;
        self.location = report.location;
        self.description = report.description;
        self.breed = report.breed;
        self.color = report.color;
        self.size = report.size;
        self.age = report.age;
        self.contact_name = report.contact_name;
        self.contact_phone = report.contact_phone;
        self.contact_email = report.contact_email;
        if image_ref.is_some() {
            self.image_ref = image_ref;
        }
        // Never move backwards, even if the wall clock does.
        self.updated_at = now.max(self.updated_at).max(self.reported_at);
    }

    /// Value of a text field by name, used by the search predicate and validators.
    pub fn text(&self, field: ReportField) -> Option<&str> {
        match field {
            ReportField::Type => Some(&self.animal_type),
            ReportField::Status => Some(&self.status),
            ReportField::Location => Some(&self.location),
            ReportField::Description => self.description.as_deref(),
            ReportField::Breed => self.breed.as_deref(),
            ReportField::Color => self.color.as_deref(),
            ReportField::Size => self.size.as_deref(),
            ReportField::Age => self.age.as_deref(),
            ReportField::ContactName => Some(&self.contact_name),
            ReportField::ContactPhone => Some(&self.contact_phone),
            ReportField::ContactEmail => Some(&self.contact_email),
        }
    }
}

/// Client-writable fields of a report.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ReportField {
    Type,
    Status,
    Location,
    Description,
    Breed,
    Color,
    Size,
    Age,
    ContactName,
    ContactPhone,
    ContactEmail,
}

impl ReportField {
    pub const ALL: [ReportField; 11] = [
        ReportField::Type,
        ReportField::Status,
        ReportField::Location,
        ReportField::Description,
        ReportField::Breed,
        ReportField::Color,
        ReportField::Size,
        ReportField::Age,
        ReportField::ContactName,
        ReportField::ContactPhone,
        ReportField::ContactEmail,
    ];

    /// Wire name (camelCase), as used in JSON bodies, form parts and error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportField::Type => "type",
            ReportField::Status => "status",
            ReportField::Location => "location",
            ReportField::Description => "description",
            ReportField::Breed => "breed",
            ReportField::Color => "color",
            ReportField::Size => "size",
            ReportField::Age => "age",
            ReportField::ContactName => "contactName",
            ReportField::ContactPhone => "contactPhone",
            ReportField::ContactEmail => "contactEmail",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for ReportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw report data as submitted by a client (JSON body or multipart text parts).
///
/// Everything is optional here; required-ness is decided by the active [`ReportSchema`].
/// Server-owned fields (`id`, `reportedAt`, `updatedAt`, `imageRef`) are ignored if sent.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub animal_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_email: Option<String>,
}

impl ReportInput {
    pub fn get(&self, field: ReportField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: ReportField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    fn slot(&self, field: ReportField) -> &Option<String> {
        match field {
            ReportField::Type => &self.animal_type,
            ReportField::Status => &self.status,
            ReportField::Location => &self.location,
            ReportField::Description => &self.description,
            ReportField::Breed => &self.breed,
            ReportField::Color => &self.color,
            ReportField::Size => &self.size,
            ReportField::Age => &self.age,
            ReportField::ContactName => &self.contact_name,
            ReportField::ContactPhone => &self.contact_phone,
            ReportField::ContactEmail => &self.contact_email,
        }
    }

    fn slot_mut(&mut self, field: ReportField) -> &mut Option<String> {
        match field {
            ReportField::Type => &mut self.animal_type,
            ReportField::Status => &mut self.status,
            ReportField::Location => &mut self.location,
            ReportField::Description => &mut self.description,
            ReportField::Breed => &mut self.breed,
            ReportField::Color => &mut self.color,
            ReportField::Size => &mut self.size,
            ReportField::Age => &mut self.age,
            ReportField::ContactName => &mut self.contact_name,
            ReportField::ContactPhone => &mut self.contact_phone,
            ReportField::ContactEmail => &mut self.contact_email,
        }
    }
}

/// Report data that passed validation: trimmed, enumerations normalized to canonical values,
/// blank optional fields collapsed to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReport {
    pub animal_type: String,
    pub status: String,
    pub location: String,
    pub description: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub age: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
}

/// Accepts strings, numbers and booleans (e.g. `"age": 3`) and keeps them as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value as JsonValue;

    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s)),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        JsonValue::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!("expected text, got {}", other))),
    }
}
