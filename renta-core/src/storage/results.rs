//! The saved-results list and its persistence.
//!
//! The whole list lives under one key ([`RESULTS_KEY`]) as a JSON array of
//! [`SalaryRecord`]s. Every mutation serializes the complete updated list and
//! writes it in a single `set_item`; the in-memory list is replaced only after
//! that write succeeds, so a failed write leaves both sides as they were.
//!
//! Mutations only ever extend or trim a list that was read successfully. If
//! no load has succeeded yet, `save`, `save_all` and `delete` read the stored
//! list first and fail with [`ResultStoreError::Read`] when they cannot. An
//! unreadable payload is therefore never overwritten.
//!
//! Mutating methods take `&mut self`. Sharing a `ResultStore` between tasks
//! therefore needs an outer lock (e.g. `tokio::sync::Mutex`) around the whole
//! read-modify-write.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, error, info};

use super::kv::KeyValueStore;
use crate::models::{RecordId, SalaryRecord};
use crate::validation::ValidationError;

/// Storage key holding the serialized result list.
pub const RESULTS_KEY: &str = "resultados";

#[derive(Debug, Error)]
pub enum ResultStoreError {
    /// The store could not be reached or its payload could not be parsed.
    #[error("could not read saved results: {0}")]
    Read(String),

    /// The updated list could not be written.
    #[error("could not write saved results: {0}")]
    Write(String),

    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("a record with id '{0}' already exists")]
    DuplicateId(RecordId),
}

impl ResultStoreError {
    fn read(err: impl std::fmt::Display) -> Self {
        Self::Read(err.to_string())
    }

    fn write(err: impl std::fmt::Display) -> Self {
        Self::Write(err.to_string())
    }
}

/// In-memory view of the saved results, kept equal to the persisted list.
pub struct ResultStore<S: KeyValueStore> {
    store: S,
    records: Vec<SalaryRecord>,
    /// True once `records` mirrors a successful read or write.
    loaded: bool,
}

impl<S: KeyValueStore> ResultStore<S> {
    /// Wraps `store` with an empty in-memory list. Call [`Self::load_all`]
    /// to pick up previously saved results.
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            loaded: false,
        }
    }

    /// Current in-memory list, in save order.
    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&SalaryRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reloads the list from storage.
    ///
    /// A missing key yields an empty list. On failure the in-memory list is
    /// cleared, the error is logged and returned as
    /// [`ResultStoreError::Read`].
    pub async fn load_all(&mut self) -> Result<&[SalaryRecord], ResultStoreError> {
        match self.read_persisted().await {
            Ok(records) => {
                debug!(count = records.len(), "loaded saved results");
                self.records = records;
                self.loaded = true;
                Ok(&self.records)
            }
            Err(err) => {
                error!(error = %err, "failed to load saved results");
                self.records.clear();
                self.loaded = false;
                Err(err)
            }
        }
    }

    /// Appends `record` and persists the full list.
    ///
    /// # Errors
    /// * [`ResultStoreError::Validation`] if the record is incomplete or its
    ///   derived fields are inconsistent. Nothing is written.
    /// * [`ResultStoreError::Read`] if the stored list has not been loaded
    ///   and cannot be read now. Nothing is written.
    /// * [`ResultStoreError::DuplicateId`] if the id is already present.
    /// * [`ResultStoreError::Write`] if the write fails. The in-memory list
    ///   is left unchanged.
    pub async fn save(&mut self, record: SalaryRecord) -> Result<(), ResultStoreError> {
        let id = record.id.clone();
        self.save_all(vec![record]).await?;
        info!(%id, count = self.records.len(), "saved result");
        Ok(())
    }

    /// Appends every record in `batch` with a single write.
    ///
    /// Either all records are saved or none are: the batch is validated and
    /// checked for duplicate ids (against the list and within itself) before
    /// anything is written. Errors are the same as [`Self::save`]. Returns
    /// the number of records appended.
    pub async fn save_all(&mut self, batch: Vec<SalaryRecord>) -> Result<usize, ResultStoreError> {
        for record in &batch {
            record.validate()?;
        }
        if batch.is_empty() {
            return Ok(0);
        }
        self.ensure_loaded().await?;

        let mut seen: HashSet<&RecordId> = self.records.iter().map(|r| &r.id).collect();
        if let Some(dup) = batch.iter().find(|r| !seen.insert(&r.id)) {
            return Err(ResultStoreError::DuplicateId(dup.id.clone()));
        }

        let added = batch.len();
        let mut updated = self.records.clone();
        updated.extend(batch);

        self.commit(updated).await?;
        debug!(added, count = self.records.len(), "appended results");
        Ok(added)
    }

    /// Removes the record with `id` and persists the remaining list.
    ///
    /// Returns `Ok(false)` without writing when no record has that id.
    pub async fn delete(&mut self, id: &RecordId) -> Result<bool, ResultStoreError> {
        self.ensure_loaded().await?;
        if self.get(id).is_none() {
            debug!(%id, "delete requested for unknown id");
            return Ok(false);
        }

        let updated: Vec<SalaryRecord> = self
            .records
            .iter()
            .filter(|r| &r.id != id)
            .cloned()
            .collect();

        self.commit(updated).await?;
        info!(%id, count = self.records.len(), "deleted result");
        Ok(true)
    }

    async fn ensure_loaded(&mut self) -> Result<(), ResultStoreError> {
        if !self.loaded {
            debug!("reading saved results before writing");
            self.records = self.read_persisted().await?;
            self.loaded = true;
        }
        Ok(())
    }

    async fn read_persisted(&self) -> Result<Vec<SalaryRecord>, ResultStoreError> {
        let payload = self
            .store
            .get_item(RESULTS_KEY)
            .await
            .map_err(ResultStoreError::read)?;

        match payload {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(ResultStoreError::read),
        }
    }

    async fn commit(&mut self, updated: Vec<SalaryRecord>) -> Result<(), ResultStoreError> {
        let json = serde_json::to_string(&updated).map_err(ResultStoreError::write)?;
        if let Err(err) = self.store.set_item(RESULTS_KEY, &json).await {
            error!(error = %err, "failed to write saved results");
            return Err(ResultStoreError::write(err));
        }
        self.records = updated;
        self.loaded = true;
        Ok(())
    }
}
