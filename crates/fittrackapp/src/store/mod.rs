//! # Storage Layer
//!
//! This module defines the storage abstraction for fittrack. The [`DataStore`] trait
//! is the single contract that every backend satisfies, so the rest of the
//! application never knows which one it is talking to.
//!
//! ## Backends
//!
//! - [`memory::MemStore`]: Volatile, process-lifetime state. One instance per
//!   application, owned by the [`selector::BackendSelector`].
//! - [`file::FileStore`]: Delimited text lines in `history.csv` plus a one-line
//!   `profile.csv`. Human-diffable; see [`line`] for the codec.
//! - [`sqlite::SqliteStore`]: A SQLite database with auto-generated row ids and native
//!   `ORDER BY`.
//!
//! ## Normalized Behavior
//!
//! The backends have very different native capabilities, so the contract pins down
//! the observable behavior:
//!
//! - **Listing**: newest-first by date, ties in insertion order.
//! - **Search**: case-insensitive substring match on operation type OR details. An
//!   empty term matches everything. Results come back in listing order.
//! - **Sort**: stable over insertion order. Strings compare case-insensitively, dates
//!   chronologically. Descending flips the comparison, not the tie order.
//! - **Filter**: exact, case-sensitive operation type match. Listing order.
//! - **By-id writes** return `Ok(false)` when nothing matched. A missing record is
//!   never an error at this layer; lookups return `Ok(None)`.
//! - **Profiles**: id `0` ([`crate::model::CURRENT_PROFILE`]) is the current snapshot.
//!   Memory and file backends only know id `0`; any other id is a no-op.
//!
//! ## Failure Policy
//!
//! I/O and query failures surface as typed errors, never as an empty result. A failed
//! write leaves previously persisted records intact. There is no atomicity across
//! several writes.
//!
//! ## Storage Layout (file backend)
//!
//! ```text
//! <data_dir>/
//! ├── history.csv     # id,date,operation_type,details,active
//! └── profile.csv     # current,target,target_date,workouts,duration
//! ```

use crate::error::{FitError, Result};
use crate::model::{today, BackendKind, EntryId, HistoryEntry, ProfileSnapshot, SortField};
use chrono::NaiveDate;

pub mod file;
pub mod line;
pub mod memory;
pub mod query;
pub mod selector;
pub mod sqlite;

/// Longest operation type accepted (the width of the SQL column).
pub const MAX_OPERATION_TYPE_LEN: usize = 50;

/// Abstract interface for profile and history storage.
///
/// Reads take `&self`; writes take `&mut self`. Implementations must follow the
/// normalized behavior documented at the module level.
pub trait DataStore {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    // --- Profile ---

    /// Upsert the current profile snapshot.
    fn save_profile(&mut self, profile: &ProfileSnapshot) -> Result<()>;

    fn get_profile(&self, id: EntryId) -> Result<Option<ProfileSnapshot>>;

    /// Replace an existing profile. Returns false if there was nothing to replace.
    fn update_profile(&mut self, id: EntryId, profile: &ProfileSnapshot) -> Result<bool>;

    fn delete_profile(&mut self, id: EntryId) -> Result<bool>;

    // --- History ---

    /// Append a new active entry dated today.
    fn save_history_entry(&mut self, operation_type: &str, details: &str) -> Result<HistoryEntry> {
        self.save_history_entry_dated(today(), operation_type, details)
    }

    /// Append a new active entry with an explicit date.
    fn save_history_entry_dated(
        &mut self,
        date: NaiveDate,
        operation_type: &str,
        details: &str,
    ) -> Result<HistoryEntry>;

    /// All entries, newest first.
    fn list_history(&self) -> Result<Vec<HistoryEntry>>;

    fn get_history_entry(&self, id: EntryId) -> Result<Option<HistoryEntry>>;

    /// Replace date, operation type, details and active flag of an entry.
    /// The id is never changed.
    fn update_history_entry(&mut self, id: EntryId, entry: &HistoryEntry) -> Result<bool>;

    fn delete_history_entry(&mut self, id: EntryId) -> Result<bool>;

    fn set_history_active(&mut self, id: EntryId, active: bool) -> Result<bool>;

    fn search_history(&self, term: &str) -> Result<Vec<HistoryEntry>>;

    fn sort_history(&self, field: SortField, ascending: bool) -> Result<Vec<HistoryEntry>>;

    fn filter_history_by_type(&self, operation_type: &str) -> Result<Vec<HistoryEntry>>;
}

/// Checks an operation type before it reaches any backend.
///
/// The same rules apply everywhere so that a value accepted by one backend is
/// accepted by all of them: non-blank, at most [`MAX_OPERATION_TYPE_LEN`] characters,
/// no commas (file delimiter) and no line breaks.
pub fn validate_operation_type(operation_type: &str) -> Result<()> {
    if operation_type.trim().is_empty() {
        return Err(FitError::Validation(
            "operation type cannot be empty".to_string(),
        ));
    }
    if operation_type.chars().count() > MAX_OPERATION_TYPE_LEN {
        return Err(FitError::Validation(format!(
            "operation type is longer than {} characters",
            MAX_OPERATION_TYPE_LEN
        )));
    }
    if operation_type.contains([',', '\n', '\r']) {
        return Err(FitError::Validation(format!(
            "operation type '{}' cannot contain commas or line breaks",
            operation_type.escape_debug()
        )));
    }
    Ok(())
}

/// Validation shared by `update_history_entry` implementations.
pub(crate) fn validate_entry(entry: &HistoryEntry) -> Result<()> {
    validate_operation_type(&entry.operation_type)
}
