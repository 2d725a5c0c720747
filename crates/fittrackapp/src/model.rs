//! # Domain Model: Profiles and History Entries
//!
//! This module defines the two persisted record shapes, [`ProfileSnapshot`] and
//! [`HistoryEntry`], plus the small enums every backend agrees on ([`SortField`],
//! [`BackendKind`]).
//!
//! ## Profile Snapshots
//!
//! A snapshot is the user's *current* goal state: weights, target date, and the
//! workout load for this week. It is overwritten every time the user runs a goal
//! calculation or a workload analysis. Every backend addresses the current snapshot
//! as [`CURRENT_PROFILE`] (id `0`).
//!
//! ## History Entries
//!
//! One entry is logged per completed operation. Entries carry a backend-assigned
//! [`EntryId`], a calendar date, a free-form operation type, the result text, and an
//! `active` flag. The flag is a visibility toggle (soft delete); physical deletion is a
//! separate operation.
//!
//! ## Identifiers
//!
//! Ids are positive and monotonically increasing on every backend:
//! - **SQLite**: the row id (`AUTOINCREMENT`), durable across restarts.
//! - **File**: the leading numeric field of each line, `max + 1` on insert.
//! - **Memory**: an in-process counter, lost on restart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FitError, Result};

/// Backend-assigned identifier of a history entry (or of a profile row on SQLite).
pub type EntryId = i64;

/// The id that addresses "the" current profile snapshot on every backend.
pub const CURRENT_PROFILE: EntryId = 0;

/// Well-known operation types. The set is open: any other string is accepted.
pub mod operation {
    pub const PROGRESS_CALCULATION: &str = "progress calculation";
    pub const OVERTRAINING_CHECK: &str = "overtraining check";
    pub const UNIT_CONVERSION: &str = "unit conversion";
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| FitError::Validation(format!("invalid date '{}': {}", raw.trim(), e)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Current body weight in kilograms.
    pub current_weight: f64,
    /// Goal body weight in kilograms.
    pub target_weight: f64,
    pub target_date: NaiveDate,
    pub workouts_this_week: u32,
    /// Average workout length in minutes.
    pub avg_workout_duration: u32,
}

impl ProfileSnapshot {
    pub fn new(
        current_weight: f64,
        target_weight: f64,
        target_date: NaiveDate,
        workouts_this_week: u32,
        avg_workout_duration: u32,
    ) -> Self {
        Self {
            current_weight,
            target_weight,
            target_date,
            workouts_this_week,
            avg_workout_duration,
        }
    }

    /// Rejects weights that are not finite positive numbers.
    pub fn validate(&self) -> Result<()> {
        validate_weight("current weight", self.current_weight)?;
        validate_weight("target weight", self.target_weight)?;
        Ok(())
    }
}

fn validate_weight(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FitError::Validation(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub operation_type: String,
    pub details: String,
    pub active: bool,
}

impl HistoryEntry {
    /// A new, active entry.
    pub fn new(
        id: EntryId,
        date: NaiveDate,
        operation_type: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            operation_type: operation_type.into(),
            details: details.into(),
            active: true,
        }
    }

    /// Human label for the active flag.
    pub fn status_label(&self) -> &'static str {
        if self.active {
            "active"
        } else {
            "inactive"
        }
    }
}

/// Fields history can be sorted by.
///
/// This is a closed set on purpose: the SQLite backend maps each variant to a fixed
/// column expression, so caller-supplied text never reaches the query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    OperationType,
    Details,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::OperationType => "operationType",
            SortField::Details => "details",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "date" | "operation_date" => Ok(SortField::Date),
            "operationType" | "operation_type" | "type" => Ok(SortField::OperationType),
            "details" => Ok(SortField::Details),
            other => Err(FitError::Validation(format!(
                "unknown sort field '{}' (expected date, operationType or details)",
                other
            ))),
        }
    }
}

/// The three interchangeable storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    File,
    Relational,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Relational => "relational",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(BackendKind::Memory),
            "file" | "fs" => Ok(BackendKind::File),
            "relational" | "sql" | "sqlite" | "db" => Ok(BackendKind::Relational),
            other => Err(FitError::Validation(format!(
                "unknown backend '{}' (expected memory, file or relational)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_entry_is_active() {
        let entry = HistoryEntry::new(1, date(2024, 1, 1), "unit conversion", "1 mi");
        assert!(entry.active);
        assert_eq!(entry.status_label(), "active");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_date(" 2024-01-01 ").unwrap(), date(2024, 1, 1));
        assert!(matches!(
            parse_date("01.01.2024"),
            Err(FitError::Validation(_))
        ));
    }

    #[test]
    fn test_profile_validation() {
        let ok = ProfileSnapshot::new(80.0, 75.0, date(2030, 1, 1), 3, 45);
        assert!(ok.validate().is_ok());

        let zero = ProfileSnapshot::new(0.0, 75.0, date(2030, 1, 1), 3, 45);
        assert!(matches!(zero.validate(), Err(FitError::Validation(_))));

        let nan = ProfileSnapshot::new(80.0, f64::NAN, date(2030, 1, 1), 3, 45);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_sort_field_aliases() {
        assert_eq!("date".parse::<SortField>().unwrap(), SortField::Date);
        assert_eq!(
            "operation_date".parse::<SortField>().unwrap(),
            SortField::Date
        );
        assert_eq!(
            "operationType".parse::<SortField>().unwrap(),
            SortField::OperationType
        );
        assert_eq!(
            "type".parse::<SortField>().unwrap(),
            SortField::OperationType
        );
        assert_eq!("details".parse::<SortField>().unwrap(), SortField::Details);
    }

    #[test]
    fn test_sort_field_rejects_unknown_names() {
        let err = "id; DROP TABLE history".parse::<SortField>().unwrap_err();
        assert!(matches!(err, FitError::Validation(_)));
    }

    #[test]
    fn test_backend_kind_parse_and_display() {
        assert_eq!("Memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert_eq!("sqlite".parse::<BackendKind>().unwrap(), BackendKind::Relational);
        assert_eq!(BackendKind::File.to_string(), "file");
        assert!("redis".parse::<BackendKind>().is_err());
    }
}
