//! The animal report service.
//!
//! Orchestrates every operation as validate -> load -> compute/mutate -> persist.
//! The record store is the only shared mutable state, so all access to it goes through
//! one read/write lock: writes hold it exclusively across load + mutate + replace (no lost
//! updates), reads share it and never observe a half-applied write.

use crate::app::error::ServiceError;
use crate::domain::model::{AnimalRecord, ReportInput, ReportSchema};
use crate::domain::query::{filter_records, sort_newest_first, summarize, AnimalQuery, Stats};
use crate::domain::validate::validate_report;
use crate::storage::records::RecordStore;
use crate::storage::uploads::PendingUpload;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub struct ReportService {
    store: Arc<dyn RecordStore>,
    schema: Arc<ReportSchema>,
    /// Serialization point for the store. Guards no data of its own.
    store_lock: RwLock<()>,
}

impl ReportService {
    pub fn new(store: Arc<dyn RecordStore>, schema: Arc<ReportSchema>) -> Self {
        Self {
            store,
            schema,
            store_lock: RwLock::new(()),
        }
    }

    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    async fn load(&self) -> Result<Vec<AnimalRecord>, ServiceError> {
        self.store.load_all().await.map_err(|e| {
            error!(error = %e, store = %self.store.describe(), "Failed to load animal records");
            ServiceError::Storage(e)
        })
    }

    async fn persist(&self, records: &[AnimalRecord]) -> Result<(), ServiceError> {
        self.store.replace_all(records).await.map_err(|e| {
            error!(error = %e, store = %self.store.describe(), "Failed to persist animal records");
            ServiceError::Storage(e)
        })
    }

    /// Filtered listing, newest report first.
    #[instrument(name = "animals.service.list", skip(self))]
    pub async fn list(&self, query: &AnimalQuery) -> Result<Vec<AnimalRecord>, ServiceError> {
        let records = {
            let _read = self.store_lock.read().await;
            self.load().await?
        };
        let mut matched = filter_records(records, query);
        sort_newest_first(&mut matched);
        debug!(count = matched.len(), "Listed animal reports");
        Ok(matched)
    }

    #[instrument(name = "animals.service.get", skip(self))]
    pub async fn get(&self, id: &str) -> Result<AnimalRecord, ServiceError> {
        let records = {
            let _read = self.store_lock.read().await;
            self.load().await?
        };
        records
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::not_found(id))
    }

    #[instrument(name = "animals.service.stats", skip(self))]
    pub async fn stats(&self) -> Result<Stats, ServiceError> {
        let records = {
            let _read = self.store_lock.read().await;
            self.load().await?
        };
        Ok(summarize(&records, &self.schema))
    }

    /// Number of persisted reports.
    pub async fn count(&self) -> Result<usize, ServiceError> {
        let _read = self.store_lock.read().await;
        Ok(self.load().await?.len())
    }

    /// Creates a report. The id and `reportedAt` are assigned here, never taken from the client.
    ///
    /// An attached upload is kept only if the new record is persisted.
    #[instrument(name = "animals.service.create", skip(self, input, upload), fields(has_image = upload.is_some()))]
    pub async fn create(
        &self,
        input: ReportInput,
        upload: Option<PendingUpload>,
    ) -> Result<AnimalRecord, ServiceError> {
        let report = validate_report(&input, &self.schema).map_err(ServiceError::Validation)?;

        let _write = self.store_lock.write().await;
        let mut records = self.load().await?;

        let mut id = Uuid::new_v4().to_string();
        while records.iter().any(|r| r.id == id) {
            id = Uuid::new_v4().to_string();
        }
        let image_ref = upload.as_ref().map(|u| u.reference().to_string());
        let record = AnimalRecord::create(id, report, image_ref, Utc::now());
        records.push(record.clone());

        self.persist(&records).await?;
        if let Some(upload) = upload {
            upload.commit();
        }
        info!(id = %record.id, animal_type = %record.animal_type, "Animal report created");
        Ok(record)
    }

    /// Replaces all writable fields of an existing report and refreshes `updatedAt`.
    ///
    /// `imageRef` changes only when a new upload is attached.
    #[instrument(name = "animals.service.update", skip(self, input, upload), fields(has_image = upload.is_some()))]
    pub async fn update(
        &self,
        id: &str,
        input: ReportInput,
        upload: Option<PendingUpload>,
    ) -> Result<AnimalRecord, ServiceError> {
        let report = validate_report(&input, &self.schema).map_err(ServiceError::Validation)?;

        let _write = self.store_lock.write().await;
        let mut records = self.load().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::not_found(id))?;

        let image_ref = upload.as_ref().map(|u| u.reference().to_string());
        record.apply_update(report, image_ref, Utc::now());
        let updated = record.clone();

        self.persist(&records).await?;
        if let Some(upload) = upload {
            upload.commit();
        }
        info!(id = %updated.id, status = %updated.status, "Animal report updated");
        Ok(updated)
    }
}
