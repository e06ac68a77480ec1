use std::path::PathBuf;

/// Coarse classification of a [`PatientError`].
///
/// Callers that translate store failures into HTTP statuses or user-facing messages match on
/// this rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was missing or blank. User-correctable.
    Validation,
    /// No record matches the requested id.
    NotFound,
    /// The underlying storage failed.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("patient {0} not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error(
        "failed to open patient store (path: {path}): {source}",
        path = path.display()
    )]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to close patient store: {0}")]
    StoreClose(rusqlite::Error),
    #[error("patient store connection lock poisoned")]
    LockPoisoned,
    #[error("invalid stored timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PatientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PatientError::Validation(_) => ErrorKind::Validation,
            PatientError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Storage,
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_groups_every_fault_under_storage() {
        assert_eq!(
            PatientError::Validation("name".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(PatientError::NotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(PatientError::LockPoisoned.kind(), ErrorKind::Storage);
        assert_eq!(
            PatientError::Storage(rusqlite::Error::InvalidQuery).kind(),
            ErrorKind::Storage
        );
        assert_eq!(
            PatientError::InvalidConfig("x".into()).kind(),
            ErrorKind::Storage
        );
    }
}
