use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage I/O error: {0}")]
    StorageIo(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl FitError {
    /// True for failures of the storage layer itself, as opposed to bad input
    /// or a missing record.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            FitError::StorageUnavailable(_) | FitError::StorageIo(_) | FitError::Sqlite(_)
        )
    }
}

impl From<confique::Error> for FitError {
    fn from(err: confique::Error) -> Self {
        FitError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_classified() {
        assert!(FitError::StorageIo("disk".into()).is_storage());
        assert!(FitError::StorageUnavailable("gone".into()).is_storage());
        assert!(FitError::Sqlite(rusqlite::Error::InvalidQuery).is_storage());
        assert!(!FitError::Validation("bad".into()).is_storage());
        assert!(!FitError::NotFound("history entry 1".into()).is_storage());
        assert!(!FitError::Config("missing".into()).is_storage());
    }
}
