//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every fittrack client.
//!
//! The facade:
//! - **Dispatches** to the matching function in `commands/*.rs`
//! - **Normalizes inputs** (sort field names, backend names) into typed values
//! - **Owns the [`BackendSelector`]** and always routes through the active backend
//!
//! It contains no business logic and never prints. Clients render the returned
//! [`CmdResult`].
//!
//! ## Testing Strategy
//!
//! API tests check that calls reach the active backend with the right arguments.
//! Command logic is tested in the command modules, storage in the store modules.

use crate::commands::{self, history::EntryEdit, CmdResult};
use crate::config::{FitTrackConfig, StorageConfig};
use crate::error::Result;
use crate::model::{today, BackendKind, EntryId, ProfileSnapshot, SortField};
use crate::store::selector::{BackendSelector, BackendSwitch};
use crate::store::DataStore;

pub struct FitTrackApi {
    selector: BackendSelector,
}

impl FitTrackApi {
    pub fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    /// Build the selector from `config` and activate the configured backend.
    pub fn open(config: &FitTrackConfig) -> Result<Self> {
        Self::open_storage(config.storage.clone())
    }

    pub fn open_storage(storage: StorageConfig) -> Result<Self> {
        let backend = storage.backend()?;
        let mut selector = BackendSelector::new(storage);
        selector.select(backend)?;
        Ok(Self { selector })
    }

    pub fn active_backend(&self) -> BackendKind {
        self.selector.active_kind()
    }

    pub fn storage_config(&self) -> &StorageConfig {
        self.selector.config()
    }

    /// Direct access to the active backend.
    pub fn store(&self) -> &dyn DataStore {
        self.selector.active()
    }

    pub fn on_backend_switch(&mut self, listener: impl FnMut(&BackendSwitch) + 'static) {
        self.selector.on_switch(listener);
    }

    pub fn select_backend(&mut self, kind: &str) -> Result<CmdResult> {
        let kind: BackendKind = kind.parse()?;
        commands::backend::select(&mut self.selector, kind)
    }

    // --- Calculations ---

    pub fn calculate_progress(&mut self, snapshot: &ProfileSnapshot) -> Result<CmdResult> {
        commands::progress::run(self.selector.active_mut(), snapshot, today())
    }

    pub fn check_workload(&mut self, workouts: u32, avg_minutes: u32) -> Result<CmdResult> {
        commands::workload::run(self.selector.active_mut(), workouts, avg_minutes, today())
    }

    pub fn convert_miles(&mut self, miles: f64) -> Result<CmdResult> {
        commands::convert::run(self.selector.active_mut(), miles, today())
    }

    // --- History ---

    pub fn list_history(&self) -> Result<CmdResult> {
        commands::history::list(self.selector.active())
    }

    pub fn search_history(&self, term: &str) -> Result<CmdResult> {
        commands::history::search(self.selector.active(), term)
    }

    pub fn sort_history(&self, field: &str, ascending: bool) -> Result<CmdResult> {
        let field: SortField = field.parse()?;
        commands::history::sort(self.selector.active(), field, ascending)
    }

    pub fn filter_history(&self, operation_type: &str) -> Result<CmdResult> {
        commands::history::filter(self.selector.active(), operation_type)
    }

    pub fn show_entry(&self, id: EntryId) -> Result<CmdResult> {
        commands::history::show(self.selector.active(), id)
    }

    pub fn edit_entry(&mut self, id: EntryId, changes: EntryEdit) -> Result<CmdResult> {
        commands::history::edit(self.selector.active_mut(), id, changes)
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<CmdResult> {
        commands::history::delete(self.selector.active_mut(), id)
    }

    pub fn set_entry_active(&mut self, id: EntryId, active: bool) -> Result<CmdResult> {
        commands::history::set_active(self.selector.active_mut(), id, active)
    }

    // --- Profile ---

    pub fn show_profile(&self) -> Result<CmdResult> {
        commands::profile::show(self.selector.active())
    }

    pub fn delete_profile(&mut self) -> Result<CmdResult> {
        commands::profile::delete(self.selector.active_mut())
    }
}
