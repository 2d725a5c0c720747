use super::line::{self, decode_entry, decode_profile, encode_entry, encode_profile};
use super::{query, validate_entry, validate_operation_type, DataStore};
use crate::error::{FitError, Result};
use crate::model::{BackendKind, EntryId, HistoryEntry, ProfileSnapshot, SortField, CURRENT_PROFILE};
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub const HISTORY_FILE: &str = "history.csv";
pub const PROFILE_FILE: &str = "profile.csv";

/// Flat-file storage: one history entry per line, one profile line.
///
/// Every line carries its id as the leading field, and every by-id operation keys
/// on it. Inserts append; edits and deletes rewrite the whole file through a temp
/// file and a rename, so an interrupted write never truncates existing records.
///
/// Reads are lenient: a line that cannot be decoded is logged and skipped instead of
/// failing the whole read. Rewrites carry such lines over untouched.
pub struct FileStore {
    root: PathBuf,
}

/// What to do with the matched entry during a rewrite.
enum Rewrite {
    Replace(HistoryEntry),
    Remove,
}

impl FileStore {
    /// Opens (creating if needed) the data directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| {
                FitError::StorageUnavailable(format!("cannot create {}: {}", root.display(), e))
            })?;
        }
        if !root.is_dir() {
            return Err(FitError::StorageUnavailable(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        debug!(root = %root.display(), "file store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    /// Raw file bytes, or nothing if the file does not exist yet.
    fn read_raw(&self, path: &Path) -> Result<Vec<u8>> {
        match fs::read(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(io_error("read", path, e)),
        }
    }

    fn load_entries(&self) -> Result<Vec<HistoryEntry>> {
        let path = self.history_path();
        let content = self.read_raw(&path)?;
        let mut entries = Vec::new();

        for (n, raw) in raw_lines(&content).enumerate() {
            if is_blank(raw) {
                continue;
            }
            let decoded = std::str::from_utf8(raw)
                .map_err(|e| e.to_string())
                .and_then(|text| decode_entry(text).map_err(|e| e.to_string()));
            match decoded {
                Ok(entry) => entries.push(entry),
                Err(error) => warn!(
                    file = %path.display(),
                    line = n + 1,
                    %error,
                    "skipping malformed history line"
                ),
            }
        }
        Ok(entries)
    }

    /// Replace or remove the first entry with `id`. Returns false (and writes
    /// nothing) if no decodable line carries that id. Undecodable lines, including
    /// ones that are not valid UTF-8, are written back byte for byte.
    fn rewrite_entry(&self, id: EntryId, edit: impl FnOnce(HistoryEntry) -> Rewrite) -> Result<bool> {
        let path = self.history_path();
        let content = self.read_raw(&path)?;
        let mut edit = Some(edit);
        let mut out = Vec::with_capacity(content.len());

        for raw in raw_lines(&content) {
            if is_blank(raw) {
                continue;
            }
            let matched = match std::str::from_utf8(raw).ok().map(decode_entry) {
                Some(Ok(entry)) if entry.id == id => Some(entry),
                _ => None,
            };
            match (matched, edit.take()) {
                (Some(entry), Some(f)) => {
                    if let Rewrite::Replace(updated) = f(entry) {
                        out.extend_from_slice(encode_entry(&updated).as_bytes());
                        out.push(b'\n');
                    }
                }
                (_, pending) => {
                    edit = pending;
                    out.extend_from_slice(raw);
                    out.push(b'\n');
                }
            }
        }

        if edit.is_some() {
            return Ok(false);
        }
        self.write_atomic(&path, &out)?;
        Ok(true)
    }

    fn write_atomic(&self, target: &Path, content: &[u8]) -> Result<()> {
        let tmp = self.root.join(format!(".fittrack-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(|e| io_error("write", &tmp, e))?;
        if let Err(e) = fs::rename(&tmp, target) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error("replace", target, e));
        }
        Ok(())
    }

    fn read_profile(&self) -> Result<Option<ProfileSnapshot>> {
        let path = self.profile_path();
        let content = self.read_raw(&path)?;
        let Some(raw) = raw_lines(&content).find(|l| !is_blank(l)) else {
            return Ok(None);
        };
        let decoded = std::str::from_utf8(raw)
            .map_err(|e| e.to_string())
            .and_then(|text| decode_profile(text).map_err(|e| e.to_string()));
        match decoded {
            Ok(profile) => Ok(Some(profile)),
            Err(error) => {
                warn!(file = %path.display(), %error, "ignoring malformed profile line");
                Ok(None)
            }
        }
    }

    fn write_profile(&self, profile: &ProfileSnapshot) -> Result<()> {
        let mut content = encode_profile(profile);
        content.push('\n');
        self.write_atomic(&self.profile_path(), content.as_bytes())
    }
}

/// Lines split on `\n`, with a trailing `\r` dropped.
fn raw_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    content
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// The id field only has to be ASCII; the rest of the line may be anything.
fn leading_id(raw: &[u8]) -> Option<EntryId> {
    let field = raw.split(|b| *b == b',').next()?;
    std::str::from_utf8(field).ok().and_then(line::leading_id)
}

fn io_error(action: &str, path: &Path, err: io::Error) -> FitError {
    FitError::StorageIo(format!("cannot {} {}: {}", action, path.display(), err))
}

impl DataStore for FileStore {
    fn kind(&self) -> BackendKind {
        BackendKind::File
    }

    fn save_profile(&mut self, profile: &ProfileSnapshot) -> Result<()> {
        profile.validate()?;
        self.write_profile(profile)
    }

    fn get_profile(&self, id: EntryId) -> Result<Option<ProfileSnapshot>> {
        if id != CURRENT_PROFILE {
            return Ok(None);
        }
        self.read_profile()
    }

    fn update_profile(&mut self, id: EntryId, profile: &ProfileSnapshot) -> Result<bool> {
        if id != CURRENT_PROFILE || self.read_profile()?.is_none() {
            return Ok(false);
        }
        profile.validate()?;
        self.write_profile(profile)?;
        Ok(true)
    }

    fn delete_profile(&mut self, id: EntryId) -> Result<bool> {
        if id != CURRENT_PROFILE {
            return Ok(false);
        }
        let path = self.profile_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("remove", &path, e)),
        }
    }

    fn save_history_entry_dated(
        &mut self,
        date: NaiveDate,
        operation_type: &str,
        details: &str,
    ) -> Result<HistoryEntry> {
        validate_operation_type(operation_type)?;

        let path = self.history_path();
        let content = self.read_raw(&path)?;
        // Malformed lines still reserve their id if it parses
        let max_id = raw_lines(&content).filter_map(leading_id).max().unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or_else(|| {
            FitError::StorageIo(format!("no history ids left after {} in {}", max_id, path.display()))
        })?;
        let entry = HistoryEntry::new(next_id, date, operation_type, details);

        let mut record = String::new();
        if !content.is_empty() && !content.ends_with(b"\n") {
            record.push('\n');
        }
        record.push_str(&encode_entry(&entry));
        record.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error("open", &path, e))?;
        file.write_all(record.as_bytes())
            .map_err(|e| io_error("append to", &path, e))?;

        debug!(id = entry.id, operation_type, "file: history entry appended");
        Ok(entry)
    }

    fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(query::newest_first(self.load_entries()?))
    }

    fn get_history_entry(&self, id: EntryId) -> Result<Option<HistoryEntry>> {
        Ok(self.load_entries()?.into_iter().find(|e| e.id == id))
    }

    fn update_history_entry(&mut self, id: EntryId, entry: &HistoryEntry) -> Result<bool> {
        validate_entry(entry)?;
        self.rewrite_entry(id, |current| {
            Rewrite::Replace(HistoryEntry {
                id: current.id,
                date: entry.date,
                operation_type: entry.operation_type.clone(),
                details: entry.details.clone(),
                active: entry.active,
            })
        })
    }

    fn delete_history_entry(&mut self, id: EntryId) -> Result<bool> {
        self.rewrite_entry(id, |_| Rewrite::Remove)
    }

    fn set_history_active(&mut self, id: EntryId, active: bool) -> Result<bool> {
        self.rewrite_entry(id, |mut current| {
            current.active = active;
            Rewrite::Replace(current)
        })
    }

    fn search_history(&self, term: &str) -> Result<Vec<HistoryEntry>> {
        Ok(query::search(self.load_entries()?, term))
    }

    fn sort_history(&self, field: SortField, ascending: bool) -> Result<Vec<HistoryEntry>> {
        Ok(query::sort(self.load_entries()?, field, ascending))
    }

    fn filter_history_by_type(&self, operation_type: &str) -> Result<Vec<HistoryEntry>> {
        Ok(query::filter_by_type(self.load_entries()?, operation_type))
    }
}
