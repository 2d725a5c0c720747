use super::file::FileStore;
use super::memory::MemStore;
use super::sqlite::SqliteStore;
use super::DataStore;
use crate::config::StorageConfig;
use crate::error::Result;
use crate::model::{BackendKind, HistoryEntry};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of a backend switch: which backends were involved and the history view
/// reloaded from the new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendSwitch {
    pub from: BackendKind,
    pub to: BackendKind,
    pub history: Vec<HistoryEntry>,
}

impl BackendSwitch {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

pub type SwitchListener = Box<dyn FnMut(&BackendSwitch)>;

/// The backend currently in use. File and SQLite stores move in here while active
/// and are parked back in the selector's cache when another backend takes over.
enum Active {
    Memory,
    File(FileStore),
    Relational(SqliteStore),
}

impl Active {
    fn kind(&self) -> BackendKind {
        match self {
            Active::Memory => BackendKind::Memory,
            Active::File(_) => BackendKind::File,
            Active::Relational(_) => BackendKind::Relational,
        }
    }
}

/// Owns every backend the application may talk to and tracks which one is active.
///
/// The memory store is created once, here, and lives as long as the selector. File and
/// SQLite stores are opened from [`StorageConfig`] the first time they are selected and
/// cached afterwards, so switching back and forth never reconnects. Nothing is migrated
/// between backends.
pub struct BackendSelector {
    config: StorageConfig,
    memory: MemStore,
    file: Option<FileStore>,
    sqlite: Option<SqliteStore>,
    active: Active,
    listeners: Vec<SwitchListener>,
}

impl BackendSelector {
    /// A selector with the memory backend active. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_memory(config, MemStore::new())
    }

    /// Like [`new`](Self::new) but with a prepared memory store.
    pub fn with_memory(config: StorageConfig, memory: MemStore) -> Self {
        Self {
            config,
            memory,
            file: None,
            sqlite: None,
            active: Active::Memory,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn active_kind(&self) -> BackendKind {
        self.active.kind()
    }

    /// Register a callback fired after every successful [`select`](Self::select).
    pub fn on_switch(&mut self, listener: impl FnMut(&BackendSwitch) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Make `kind` the active backend and reload its history.
    ///
    /// The switch only takes effect once the new backend is open and its history
    /// has been read. On any error the previously active backend stays in place.
    pub fn select(&mut self, kind: BackendKind) -> Result<BackendSwitch> {
        let from = self.active_kind();
        let history = if kind == from {
            self.active().list_history()?
        } else {
            let target = match self.open(kind) {
                Ok(target) => target,
                Err(e) => {
                    warn!(backend = %kind, error = %e, "backend unavailable, keeping {}", from);
                    return Err(e);
                }
            };
            let reloaded = match &target {
                Active::Memory => self.memory.list_history(),
                Active::File(store) => store.list_history(),
                Active::Relational(store) => store.list_history(),
            };
            match reloaded {
                Ok(history) => {
                    let previous = std::mem::replace(&mut self.active, target);
                    self.park(previous);
                    history
                }
                Err(e) => {
                    warn!(backend = %kind, error = %e, "cannot reload history, keeping {}", from);
                    self.park(target);
                    return Err(e);
                }
            }
        };

        let switch = BackendSwitch { from, to: kind, history };
        if switch.changed() {
            info!(from = %from, to = %kind, "storage backend switched");
        } else {
            debug!(backend = %kind, "storage backend reloaded");
        }

        for listener in self.listeners.iter_mut() {
            listener(&switch);
        }
        Ok(switch)
    }

    /// Takes `kind` out of the cache, opening it on first use.
    fn open(&mut self, kind: BackendKind) -> Result<Active> {
        Ok(match kind {
            BackendKind::Memory => Active::Memory,
            BackendKind::File => match self.file.take() {
                Some(store) => Active::File(store),
                None => Active::File(FileStore::open(self.config.data_dir())?),
            },
            BackendKind::Relational => match self.sqlite.take() {
                Some(store) => Active::Relational(store),
                None => Active::Relational(SqliteStore::open(self.config.database())?),
            },
        })
    }

    fn park(&mut self, store: Active) {
        match store {
            Active::Memory => {}
            Active::File(store) => self.file = Some(store),
            Active::Relational(store) => self.sqlite = Some(store),
        }
    }

    pub fn active(&self) -> &dyn DataStore {
        match &self.active {
            Active::Memory => &self.memory,
            Active::File(store) => store,
            Active::Relational(store) => store,
        }
    }

    pub fn active_mut(&mut self) -> &mut dyn DataStore {
        match &mut self.active {
            Active::Memory => &mut self.memory,
            Active::File(store) => store,
            Active::Relational(store) => store,
        }
    }

    /// The application's memory store, whichever backend is active.
    pub fn memory(&self) -> &MemStore {
        &self.memory
    }
}
