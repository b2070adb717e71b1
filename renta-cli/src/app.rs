use std::io::Write;

use renta_core::storage::{MemoryStoreFactory, StoreRegistry};
use renta_core::{KeyValueStore, RecordId, ResultStore, SalaryRecord};
use renta_data::export_csv;
use renta_store_sqlite::SqliteStoreFactory;
use tracing::{debug, info, warn};

use crate::state::{Action, AppState, prepare_save, update};

/// Build and populate the storage backend registry.
///
/// Add new backends here; the binary never needs to know which ones exist.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Drives [`AppState`] against a result store.
///
/// Pure form changes go through [`RentaApp::dispatch`]. Operations that touch
/// storage await the store, then dispatch the outcome, so the state only ever
/// shows what storage confirmed.
pub struct RentaApp<S: KeyValueStore> {
    state: AppState,
    results: ResultStore<S>,
}

impl<S: KeyValueStore> RentaApp<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: AppState::default(),
            results: ResultStore::new(store),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        self.results.store()
    }

    pub fn dispatch(
        &mut self,
        action: Action,
    ) {
        debug!(?action, "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = update(state, action);
    }

    /// Reloads the saved list from storage.
    pub async fn load(&mut self) {
        let action = match self.results.load_all().await {
            Ok(records) => {
                info!(count = records.len(), "saved results loaded");
                Action::RecordsLoaded(records.to_vec())
            }
            Err(err) => {
                warn!(%err, "could not load saved results");
                Action::LoadFailed(err.to_string())
            }
        };
        self.dispatch(action);
    }

    /// Persists the current calculation.
    ///
    /// Nothing reaches storage unless the form is complete and calculated.
    pub async fn save(&mut self) -> Option<RecordId> {
        let record = match prepare_save(&self.state) {
            Ok(record) => record,
            Err(err) => {
                debug!(%err, "save rejected");
                self.dispatch(Action::SaveRejected(err));
                return None;
            }
        };
        let id = record.id.clone();
        match self.results.save(record).await {
            Ok(()) => {
                info!(%id, "result saved");
                let records = self.results.records().to_vec();
                self.dispatch(Action::Saved(records));
                Some(id)
            }
            Err(err) => {
                warn!(%err, "save failed");
                self.dispatch(Action::SaveFailed(err.to_string()));
                None
            }
        }
    }

    pub async fn delete(
        &mut self,
        id: &RecordId,
    ) {
        let action = match self.results.delete(id).await {
            Ok(removed) => {
                info!(%id, removed, "delete finished");
                Action::Deleted {
                    records: self.results.records().to_vec(),
                    removed,
                }
            }
            Err(err) => {
                warn!(%id, %err, "delete failed");
                Action::DeleteFailed(err.to_string())
            }
        };
        self.dispatch(action);
    }

    /// Fills the form and calculates in one step.
    pub fn calculate(
        &mut self,
        first_name: &str,
        last_name: &str,
        salary: &str,
    ) {
        self.dispatch(Action::EditFirstName(first_name.to_string()));
        self.dispatch(Action::EditLastName(last_name.to_string()));
        self.dispatch(Action::EditSalary(salary.to_string()));
        self.dispatch(Action::Calculate);
    }

    /// Writes the saved list as CSV.
    pub fn export<W: Write>(
        &self,
        writer: W,
    ) -> Result<usize, csv::Error> {
        export_csv(&self.state.records, writer)
    }

    /// Looks a saved record up by id or by a unique id prefix.
    pub fn find_record(
        &self,
        id_or_prefix: &str,
    ) -> Option<&SalaryRecord> {
        let mut matches = self
            .state
            .records
            .iter()
            .filter(|r| r.id.as_str().starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Some(record),
            _ => self
                .state
                .records
                .iter()
                .find(|r| r.id.as_str() == id_or_prefix),
        }
    }
}
