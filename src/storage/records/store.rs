//! Record store contract and its errors.

use crate::domain::model::AnimalRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read record document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record document {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("record document {path} has unsupported version {found}")]
    UnsupportedVersion { path: PathBuf, found: u64 },
    #[error("failed to write record document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-collection persistence for animal records.
///
/// Every write is a full snapshot. Callers serialize load-mutate-replace sequences
/// themselves (see `ReportService`); implementations only guarantee that a single
/// `replace_all` is all-or-nothing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Full collection in insertion order. Empty when nothing has been persisted yet.
    async fn load_all(&self) -> Result<Vec<AnimalRecord>, StorageError>;

    /// Atomically replaces the persisted collection.
    async fn replace_all(&self, records: &[AnimalRecord]) -> Result<(), StorageError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}
