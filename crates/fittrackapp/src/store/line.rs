//! # Line Codec
//!
//! The file backend stores one record per line, fields joined by commas.
//!
//! ## History Lines
//!
//! ```text
//! id,date,operation_type,details,active
//! 7,2024-02-01,unit conversion,5.00 mi = 8.05 km,true
//! ```
//!
//! `details` is free text and may contain commas, so decoding splits the first three
//! fields from the left and the flag from the right; whatever sits in between is the
//! details. Operation types are validated to never contain a comma.
//!
//! Line breaks inside `details` would split a record across lines, so `details` is
//! escaped: `\` becomes `\\`, newline becomes `\n`, carriage return becomes `\r`.
//!
//! ## Profile Lines
//!
//! ```text
//! current_weight,target_weight,target_date,workouts_this_week,avg_workout_duration
//! 80,75,2024-06-01,3,45
//! ```

use crate::model::{parse_date, EntryId, HistoryEntry, ProfileSnapshot};
use thiserror::Error;

pub const DELIMITER: char = ',';

const ENTRY_FIELDS: usize = 5;
const PROFILE_FIELDS: usize = 5;

/// Why a line could not be decoded. The file backend logs and skips such lines.
#[derive(Error, Debug, PartialEq)]
pub enum LineError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {field}: '{value}'")]
    BadField { field: &'static str, value: String },
}

fn bad(field: &'static str, value: &str) -> LineError {
    LineError::BadField {
        field,
        value: value.to_string(),
    }
}

pub fn encode_entry(entry: &HistoryEntry) -> String {
    format!(
        "{id}{d}{date}{d}{op}{d}{details}{d}{active}",
        id = entry.id,
        date = entry.date.format("%Y-%m-%d"),
        op = entry.operation_type,
        details = escape(&entry.details),
        active = entry.active,
        d = DELIMITER,
    )
}

pub fn decode_entry(line: &str) -> Result<HistoryEntry, LineError> {
    let mut head = line.splitn(4, DELIMITER);
    let (Some(id), Some(date), Some(op), Some(rest)) =
        (head.next(), head.next(), head.next(), head.next())
    else {
        return Err(LineError::FieldCount {
            expected: ENTRY_FIELDS,
            found: line.split(DELIMITER).count(),
        });
    };
    let Some((details, active)) = rest.rsplit_once(DELIMITER) else {
        return Err(LineError::FieldCount {
            expected: ENTRY_FIELDS,
            found: 4,
        });
    };

    let id: EntryId = id.trim().parse().map_err(|_| bad("id", id))?;
    let date = parse_date(date).map_err(|_| bad("date", date))?;
    let active = parse_flag(active).ok_or_else(|| bad("active flag", active))?;

    Ok(HistoryEntry {
        id,
        date,
        operation_type: op.to_string(),
        details: unescape(details),
        active,
    })
}

/// Reads only the leading id of a history line.
pub fn leading_id(line: &str) -> Option<EntryId> {
    line.split(DELIMITER).next()?.trim().parse().ok()
}

pub fn encode_profile(profile: &ProfileSnapshot) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}{d}{}",
        profile.current_weight,
        profile.target_weight,
        profile.target_date.format("%Y-%m-%d"),
        profile.workouts_this_week,
        profile.avg_workout_duration,
        d = DELIMITER,
    )
}

pub fn decode_profile(line: &str) -> Result<ProfileSnapshot, LineError> {
    let parts: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if parts.len() != PROFILE_FIELDS {
        return Err(LineError::FieldCount {
            expected: PROFILE_FIELDS,
            found: parts.len(),
        });
    }

    Ok(ProfileSnapshot {
        current_weight: parts[0]
            .parse()
            .map_err(|_| bad("current weight", parts[0]))?,
        target_weight: parts[1]
            .parse()
            .map_err(|_| bad("target weight", parts[1]))?,
        target_date: parse_date(parts[2]).map_err(|_| bad("target date", parts[2]))?,
        workouts_this_week: parts[3]
            .parse()
            .map_err(|_| bad("workouts this week", parts[3]))?,
        avg_workout_duration: parts[4]
            .parse()
            .map_err(|_| bad("average duration", parts[4]))?,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            // Unknown escapes are kept verbatim
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
