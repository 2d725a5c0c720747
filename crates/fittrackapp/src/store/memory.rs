use super::{query, validate_entry, validate_operation_type, DataStore};
use crate::error::{FitError, Result};
use crate::model::{BackendKind, EntryId, HistoryEntry, ProfileSnapshot, SortField, CURRENT_PROFILE};
use chrono::NaiveDate;
use tracing::debug;

/// Volatile storage that lives as long as the process.
///
/// Entries are kept in insertion order. Ids come from a counter that never goes
/// backwards, so deleting an entry does not renumber the rest.
///
/// There is no global instance: the application owns exactly one `MemStore` (the
/// [`BackendSelector`](super::selector::BackendSelector) holds it) and hands out
/// references.
pub struct MemStore {
    profile: Option<ProfileSnapshot>,
    history: Vec<HistoryEntry>,
    next_id: EntryId,
    simulate_write_error: bool,
}

impl Default for MemStore {
    fn default() -> Self {
        Self {
            profile: None,
            history: Vec::new(),
            next_id: 1,
            simulate_write_error: false,
        }
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Drop every profile and entry. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.profile = None;
        self.history.clear();
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(FitError::StorageIo("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.history.iter().position(|e| e.id == id)
    }

    /// Snapshot of the current entries; queries never iterate shared state.
    fn snapshot(&self) -> Vec<HistoryEntry> {
        self.history.clone()
    }
}

impl DataStore for MemStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn save_profile(&mut self, profile: &ProfileSnapshot) -> Result<()> {
        profile.validate()?;
        self.check_writable()?;
        self.profile = Some(profile.clone());
        Ok(())
    }

    fn get_profile(&self, id: EntryId) -> Result<Option<ProfileSnapshot>> {
        if id != CURRENT_PROFILE {
            return Ok(None);
        }
        Ok(self.profile.clone())
    }

    fn update_profile(&mut self, id: EntryId, profile: &ProfileSnapshot) -> Result<bool> {
        if id != CURRENT_PROFILE || self.profile.is_none() {
            return Ok(false);
        }
        profile.validate()?;
        self.check_writable()?;
        self.profile = Some(profile.clone());
        Ok(true)
    }

    fn delete_profile(&mut self, id: EntryId) -> Result<bool> {
        if id != CURRENT_PROFILE {
            return Ok(false);
        }
        self.check_writable()?;
        Ok(self.profile.take().is_some())
    }

    fn save_history_entry_dated(
        &mut self,
        date: NaiveDate,
        operation_type: &str,
        details: &str,
    ) -> Result<HistoryEntry> {
        validate_operation_type(operation_type)?;
        self.check_writable()?;

        let entry = HistoryEntry::new(self.next_id, date, operation_type, details);
        self.next_id += 1;
        self.history.push(entry.clone());
        debug!(id = entry.id, operation_type, "memory: history entry saved");
        Ok(entry)
    }

    fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(query::newest_first(self.snapshot()))
    }

    fn get_history_entry(&self, id: EntryId) -> Result<Option<HistoryEntry>> {
        Ok(self.history.iter().find(|e| e.id == id).cloned())
    }

    fn update_history_entry(&mut self, id: EntryId, entry: &HistoryEntry) -> Result<bool> {
        validate_entry(entry)?;
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };
        self.check_writable()?;

        let slot = &mut self.history[pos];
        slot.date = entry.date;
        slot.operation_type = entry.operation_type.clone();
        slot.details = entry.details.clone();
        slot.active = entry.active;
        Ok(true)
    }

    fn delete_history_entry(&mut self, id: EntryId) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };
        self.check_writable()?;
        self.history.remove(pos);
        Ok(true)
    }

    fn set_history_active(&mut self, id: EntryId, active: bool) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };
        self.check_writable()?;
        self.history[pos].active = active;
        Ok(true)
    }

    fn search_history(&self, term: &str) -> Result<Vec<HistoryEntry>> {
        Ok(query::search(self.snapshot(), term))
    }

    fn sort_history(&self, field: SortField, ascending: bool) -> Result<Vec<HistoryEntry>> {
        Ok(query::sort(self.snapshot(), field, ascending))
    }

    fn filter_history_by_type(&self, operation_type: &str) -> Result<Vec<HistoryEntry>> {
        Ok(query::filter_by_type(self.snapshot(), operation_type))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::operation;

    pub struct StoreFixture {
        pub store: MemStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemStore::new(),
            }
        }

        pub fn with_entries(mut self, count: usize) -> Self {
            for i in 0..count {
                let details = format!("{}.00 mi = {:.2} km", i + 1, (i + 1) as f64 * 1.60934);
                self.store
                    .save_history_entry(operation::UNIT_CONVERSION, &details)
                    .unwrap();
            }
            self
        }

        pub fn with_entry_on(mut self, date: NaiveDate, operation_type: &str, details: &str) -> Self {
            self.store
                .save_history_entry_dated(date, operation_type, details)
                .unwrap();
            self
        }

        pub fn with_profile(mut self, profile: ProfileSnapshot) -> Self {
            self.store.save_profile(&profile).unwrap();
            self
        }
    }
}
