//! SQLite storage backend.
//!
//! Profiles are appended as rows of `user_data`; id `0` reads the newest one. History
//! rows live in `history` with `AUTOINCREMENT` ids. Ordering and matching are done in
//! SQL and follow the same rules as [`super::query`]:
//!
//! - `list_history`: `ORDER BY operation_date DESC, id ASC`
//! - `search_history`: `instr(casefold(col), ?)` on both text columns. `casefold` is a
//!   scalar function registered on the connection that applies Unicode lowercasing, so
//!   non-ASCII text matches the way it does on the other backends.
//! - `sort_history`: a fixed expression per [`SortField`], then `id ASC`.

use super::{validate_entry, validate_operation_type, DataStore};
use crate::error::{FitError, Result};
use crate::model::{BackendKind, EntryId, HistoryEntry, ProfileSnapshot, SortField, CURRENT_PROFILE};
use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS user_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        current_weight DOUBLE PRECISION NOT NULL,
        target_weight DOUBLE PRECISION NOT NULL,
        target_date DATE NOT NULL,
        workouts_this_week INTEGER NOT NULL,
        avg_workout_duration INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        operation_date DATE NOT NULL,
        operation_type VARCHAR(50) NOT NULL,
        details TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT 1
    );

    CREATE INDEX IF NOT EXISTS idx_history_date ON history(operation_date);
    CREATE INDEX IF NOT EXISTS idx_history_type ON history(operation_type);
";

const HISTORY_COLUMNS: &str = "id, operation_date, operation_type, details, active";
const PROFILE_COLUMNS: &str =
    "current_weight, target_weight, target_date, workouts_this_week, avg_workout_duration";
const LIST_ORDER: &str = "ORDER BY operation_date DESC, id ASC";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                FitError::StorageUnavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path).map_err(|e| {
            FitError::StorageUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "sqlite store opened");
        Ok(store)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| FitError::StorageUnavailable(format!("cannot open in-memory db: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value = ctx.get::<Option<String>>(0)?;
                Ok(value.map(|s| s.to_lowercase()))
            },
        )
        .map_err(|e| FitError::StorageUnavailable(format!("cannot register casefold: {}", e)))?;

        conn.execute_batch(SCHEMA)
            .map_err(|e| FitError::StorageUnavailable(format!("cannot create schema: {}", e)))?;

        Ok(Self { conn })
    }

    /// Row id that `id` addresses in `user_data`, if that row exists.
    fn resolve_profile_id(&self, id: EntryId) -> Result<Option<EntryId>> {
        let found: Option<EntryId> = match id {
            CURRENT_PROFILE => self
                .conn
                .query_row(
                    "SELECT id FROM user_data ORDER BY id DESC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?,
            positive if positive > 0 => self
                .conn
                .query_row("SELECT id FROM user_data WHERE id = ?1", [positive], |row| {
                    row.get(0)
                })
                .optional()?,
            _ => None,
        };
        Ok(found)
    }

    fn query_entries(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, entry_from_row)?;
        let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        operation_type: row.get(2)?,
        details: row.get(3)?,
        active: row.get(4)?,
    })
}

fn profile_from_row(row: &Row) -> rusqlite::Result<ProfileSnapshot> {
    Ok(ProfileSnapshot {
        current_weight: row.get(0)?,
        target_weight: row.get(1)?,
        target_date: row.get(2)?,
        workouts_this_week: row.get(3)?,
        avg_workout_duration: row.get(4)?,
    })
}

fn sort_expression(field: SortField) -> &'static str {
    match field {
        SortField::Date => "operation_date",
        SortField::OperationType => "casefold(operation_type)",
        SortField::Details => "casefold(details)",
    }
}

impl DataStore for SqliteStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn save_profile(&mut self, profile: &ProfileSnapshot) -> Result<()> {
        profile.validate()?;
        self.conn.execute(
            &format!("INSERT INTO user_data ({}) VALUES (?1, ?2, ?3, ?4, ?5)", PROFILE_COLUMNS),
            params![
                profile.current_weight,
                profile.target_weight,
                profile.target_date,
                profile.workouts_this_week,
                profile.avg_workout_duration,
            ],
        )?;
        debug!(id = self.conn.last_insert_rowid(), "sqlite: profile saved");
        Ok(())
    }

    fn get_profile(&self, id: EntryId) -> Result<Option<ProfileSnapshot>> {
        let Some(row_id) = self.resolve_profile_id(id)? else {
            return Ok(None);
        };
        let profile = self
            .conn
            .query_row(
                &format!("SELECT {} FROM user_data WHERE id = ?1", PROFILE_COLUMNS),
                [row_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    fn update_profile(&mut self, id: EntryId, profile: &ProfileSnapshot) -> Result<bool> {
        let Some(row_id) = self.resolve_profile_id(id)? else {
            return Ok(false);
        };
        profile.validate()?;
        let changed = self.conn.execute(
            "UPDATE user_data SET current_weight = ?1, target_weight = ?2, target_date = ?3,
                 workouts_this_week = ?4, avg_workout_duration = ?5
             WHERE id = ?6",
            params![
                profile.current_weight,
                profile.target_weight,
                profile.target_date,
                profile.workouts_this_week,
                profile.avg_workout_duration,
                row_id,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_profile(&mut self, id: EntryId) -> Result<bool> {
        let Some(row_id) = self.resolve_profile_id(id)? else {
            return Ok(false);
        };
        let changed = self
            .conn
            .execute("DELETE FROM user_data WHERE id = ?1", [row_id])?;
        Ok(changed > 0)
    }

    fn save_history_entry_dated(
        &mut self,
        date: NaiveDate,
        operation_type: &str,
        details: &str,
    ) -> Result<HistoryEntry> {
        validate_operation_type(operation_type)?;
        self.conn.execute(
            "INSERT INTO history (operation_date, operation_type, details, active)
             VALUES (?1, ?2, ?3, 1)",
            params![date, operation_type, details],
        )?;
        let entry = HistoryEntry::new(self.conn.last_insert_rowid(), date, operation_type, details);
        debug!(id = entry.id, operation_type, "sqlite: history entry saved");
        Ok(entry)
    }

    fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.query_entries(
            &format!("SELECT {} FROM history {}", HISTORY_COLUMNS, LIST_ORDER),
            [],
        )
    }

    fn get_history_entry(&self, id: EntryId) -> Result<Option<HistoryEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {} FROM history WHERE id = ?1", HISTORY_COLUMNS),
                [id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn update_history_entry(&mut self, id: EntryId, entry: &HistoryEntry) -> Result<bool> {
        validate_entry(entry)?;
        let changed = self.conn.execute(
            "UPDATE history SET operation_date = ?1, operation_type = ?2, details = ?3, active = ?4
             WHERE id = ?5",
            params![entry.date, entry.operation_type, entry.details, entry.active, id],
        )?;
        Ok(changed > 0)
    }

    fn delete_history_entry(&mut self, id: EntryId) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    fn set_history_active(&mut self, id: EntryId, active: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE history SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(changed > 0)
    }

    fn search_history(&self, term: &str) -> Result<Vec<HistoryEntry>> {
        if term.is_empty() {
            return self.list_history();
        }
        self.query_entries(
            &format!(
                "SELECT {} FROM history
                 WHERE instr(casefold(operation_type), ?1) > 0
                    OR instr(casefold(details), ?1) > 0
                 {}",
                HISTORY_COLUMNS, LIST_ORDER
            ),
            [term.to_lowercase()],
        )
    }

    fn sort_history(&self, field: SortField, ascending: bool) -> Result<Vec<HistoryEntry>> {
        let direction = if ascending { "ASC" } else { "DESC" };
        self.query_entries(
            &format!(
                "SELECT {} FROM history ORDER BY {} {}, id ASC",
                HISTORY_COLUMNS,
                sort_expression(field),
                direction
            ),
            [],
        )
    }

    fn filter_history_by_type(&self, operation_type: &str) -> Result<Vec<HistoryEntry>> {
        self.query_entries(
            &format!(
                "SELECT {} FROM history WHERE operation_type = ?1 {}",
                HISTORY_COLUMNS, LIST_ORDER
            ),
            [operation_type],
        )
    }
}
