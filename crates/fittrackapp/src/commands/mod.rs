//! # Command Layer
//!
//! Business operations of fittrack. Each command combines a calculation from
//! [`crate::fitness`] with the active [`DataStore`](crate::store::DataStore) and
//! returns a structured [`CmdResult`].
//!
//! Commands never print, prompt or exit. They validate input before touching
//! storage, and they are where a missing id becomes [`FitError::NotFound`]: the store
//! contract itself only reports `None` / `false`.
//!
//! Commands are generic over `S: DataStore + ?Sized`, so they run against a concrete
//! store in tests and against `&mut dyn DataStore` from the selector in the API.
//!
//! ## Command Modules
//!
//! - [`progress`]: Weight goal pacing (saves the profile)
//! - [`workload`]: Overtraining check (merges into the profile)
//! - [`convert`]: Miles to kilometres
//! - [`history`]: List, search, sort, filter and by-id edits
//! - [`profile`]: Show or delete the current profile
//! - [`backend`]: Switch the active backend

use crate::error::{FitError, Result};
use crate::model::{BackendKind, EntryId, HistoryEntry, ProfileSnapshot};
use serde::Serialize;

pub mod backend;
pub mod convert;
pub mod history;
pub mod profile;
pub mod progress;
pub mod workload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CmdResult {
    /// Entries to display (listings) or the entries just written.
    pub entries: Vec<HistoryEntry>,
    pub profile: Option<ProfileSnapshot>,
    pub messages: Vec<CmdMessage>,
    /// Set when the command switched or reloaded a backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendKind>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_entries(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_profile(mut self, profile: Option<ProfileSnapshot>) -> Self {
        self.profile = profile;
        self
    }
}

pub(crate) fn entry_not_found(id: EntryId) -> FitError {
    FitError::NotFound(format!("history entry {}", id))
}
