//! Configurable report schema: enumerations plus a per-field rule table.
//!
//! Deployments differ in which descriptive fields are required and which statuses exist,
//! so all of that lives in data rather than code. A schema can come from a built-in
//! preset (see [`super::presets`]) or from a JSON file.

use super::ReportField;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current layout version of schema files.
pub const SCHEMA_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportSchema {
    pub name: String,
    #[serde(default = "default_format_version")]
    pub version: u32,
    /// Allowed values of `type`, canonical lowercase.
    pub types: Vec<String>,
    /// Allowed values of `status`, canonical lowercase.
    pub statuses: Vec<String>,
    /// Status assigned when the client omits one. `None` makes `status` required.
    #[serde(default)]
    pub default_status: Option<String>,
    #[serde(default)]
    pub rules: Vec<FieldRule>,
}

fn default_format_version() -> u32 {
    SCHEMA_FORMAT_VERSION
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field: ReportField,
    pub checks: Vec<Check>,
}

impl FieldRule {
    pub fn new(field: ReportField, checks: Vec<Check>) -> Self {
        Self { field, checks }
    }
}

/// A single constraint on a field value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// Present and non-blank after trimming.
    Required,
    /// Case-insensitive membership; the value is stored in its canonical form.
    OneOf { values: Vec<String> },
    MinLen { min: usize },
    MaxLen { max: usize },
    /// Digits, spaces and `+-().` only, with at least seven digits.
    Phone,
    Email,
}

impl ReportSchema {
    /// Loads a schema from a JSON file and checks it for internal consistency.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read schema file {}: {}", path.display(), e))?;
        let schema: ReportSchema = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid schema file {}: {}", path.display(), e))?;
        schema.check_consistency()?;
        Ok(schema)
    }

    /// Rejects schemas that could never accept a record or that reference unknown values.
    pub fn check_consistency(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.version == SCHEMA_FORMAT_VERSION,
            "schema '{}': unsupported version {} (expected {})",
            self.name,
            self.version,
            SCHEMA_FORMAT_VERSION
        );
        anyhow::ensure!(!self.types.is_empty(), "schema '{}': no animal types", self.name);
        anyhow::ensure!(!self.statuses.is_empty(), "schema '{}': no statuses", self.name);
        for value in self.types.iter().chain(self.statuses.iter()) {
            anyhow::ensure!(
                !value.trim().is_empty() && *value == value.to_lowercase(),
                "schema '{}': enumeration value '{}' must be non-empty lowercase",
                self.name,
                value
            );
        }
        if let Some(default) = &self.default_status {
            anyhow::ensure!(
                self.statuses.contains(default),
                "schema '{}': default status '{}' is not one of {:?}",
                self.name,
                default,
                self.statuses
            );
        }
        for rule in &self.rules {
            anyhow::ensure!(
                !matches!(rule.field, ReportField::Type | ReportField::Status),
                "schema '{}': '{}' is governed by the types/statuses lists, not rules",
                self.name,
                rule.field
            );
            for check in &rule.checks {
                if let Check::OneOf { values } = check {
                    anyhow::ensure!(
                        !values.is_empty(),
                        "schema '{}': empty one_of for '{}'",
                        self.name,
                        rule.field
                    );
                }
            }
        }
        Ok(())
    }

    /// Checks configured for a field (may be empty).
    pub fn checks_for(&self, field: ReportField) -> impl Iterator<Item = &Check> {
        self.rules
            .iter()
            .filter(move |r| r.field == field)
            .flat_map(|r| r.checks.iter())
    }

    pub fn is_required(&self, field: ReportField) -> bool {
        match field {
            ReportField::Type => true,
            ReportField::Status => self.default_status.is_none(),
            _ => self.checks_for(field).any(|c| matches!(c, Check::Required)),
        }
    }
}
