//! JSON-file-backed record store.
//!
//! Layout on disk: `{ "version": 1, "animals": [ ... ] }`. A bare JSON array (the layout
//! older deployments wrote) is still accepted on load and upgraded on the next write.

use crate::domain::model::AnimalRecord;
use crate::storage::records::store::{RecordStore, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub const DOCUMENT_VERSION: u64 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u64,
    animals: &'a [AnimalRecord],
}

#[derive(Deserialize)]
struct Document {
    animals: Vec<AnimalRecord>,
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl ToString) -> StorageError {
        StorageError::Corrupt {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<AnimalRecord>, StorageError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let value: JsonValue = serde_json::from_slice(bytes).map_err(|e| self.corrupt(e))?;
        match value {
            JsonValue::Array(_) => {
                debug!(path = %self.path.display(), "Loading legacy array record document");
                serde_json::from_value(value).map_err(|e| self.corrupt(e))
            }
            JsonValue::Object(_) => {
                let found = value.get("version").and_then(JsonValue::as_u64).unwrap_or(0);
                if found != DOCUMENT_VERSION {
                    return Err(StorageError::UnsupportedVersion {
                        path: self.path.clone(),
                        found,
                    });
                }
                let doc: Document = serde_json::from_value(value).map_err(|e| self.corrupt(e))?;
                Ok(doc.animals)
            }
            other => Err(self.corrupt(format!("expected object or array, got {}", kind(&other)))),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "animals.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
    }

    async fn write_snapshot(&self, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(tmp, &self.path).await
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<AnimalRecord>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => self.decode(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    async fn replace_all(&self, records: &[AnimalRecord]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(&DocumentRef {
            version: DOCUMENT_VERSION,
            animals: records,
        })?;

        // Write beside the target and rename over it, so a failed write leaves the old document.
        let tmp = self.temp_path();
        if let Err(e) = self.write_snapshot(&tmp, &bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temporary record document");
                }
            }
            return Err(StorageError::Write {
                path: self.path.clone(),
                source: e,
            });
        }
        debug!(path = %self.path.display(), count = records.len(), "Record document written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}
