//! SchemaRegistry for mapping schema names to report schemas.

use crate::domain::model::presets;
use crate::domain::model::ReportSchema;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A registry that maps schema names to their rule tables.
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<ReportSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Creates a registry holding every built-in preset.
    pub fn with_presets() -> Self {
        let mut registry = Self::new();
        for schema in presets::all() {
            registry.register(schema);
        }
        registry
    }

    /// Registers a schema under its own name, replacing any previous one.
    pub fn register(&mut self, schema: ReportSchema) {
        self.schemas.insert(schema.name.clone(), Arc::new(schema));
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<ReportSchema>> {
        self.schemas.get(name).cloned()
    }

    /// Returns all registered schema names, sorted.
    pub fn list_schemas(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }

    /// Picks the active schema: a schema file wins over the named preset.
    pub fn resolve(&mut self, name: &str, file: Option<&Path>) -> anyhow::Result<Arc<ReportSchema>> {
        if let Some(path) = file {
            let schema = ReportSchema::from_json_file(path)?;
            let name = schema.name.clone();
            self.register(schema);
            return self
                .get(&name)
                .ok_or_else(|| anyhow::anyhow!("schema '{}' vanished after registration", name));
        }
        self.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown schema '{}' (available: {})",
                name,
                self.list_schemas().join(", ")
            )
        })
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_presets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_presets_by_name() {
        let mut registry = SchemaRegistry::with_presets();
        assert_eq!(registry.list_schemas(), vec!["community", "standard"]);
        let schema = registry.resolve("community", None).unwrap();
        assert!(schema.default_status.is_none());
    }

    #[test]
    fn unknown_name_lists_alternatives() {
        let mut registry = SchemaRegistry::with_presets();
        let err = registry.resolve("nope", None).unwrap_err().to_string();
        assert!(err.contains("standard"), "{}", err);
    }
}
