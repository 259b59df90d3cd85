//! In-memory record store for tests and throwaway deployments.

use crate::domain::model::AnimalRecord;
use crate::storage::records::store::{RecordStore, StorageError};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AnimalRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AnimalRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<AnimalRecord>, StorageError> {
        Ok(self.records.lock().await.clone())
    }

    async fn replace_all(&self, records: &[AnimalRecord]) -> Result<(), StorageError> {
        *self.records.lock().await = records.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
