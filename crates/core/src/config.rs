//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! nothing reads process-wide environment variables while requests are being handled.

use crate::constants::DEFAULT_DATABASE_PATH;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidConfig` if the path is empty or names an existing directory.
    pub fn new(database_path: PathBuf) -> PatientResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(PatientError::InvalidConfig(
                "database path cannot be empty".into(),
            ));
        }

        if database_path.is_dir() {
            return Err(PatientError::InvalidConfig(format!(
                "database path is a directory: {}",
                database_path.display()
            )));
        }

        Ok(Self { database_path })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

/// Resolve the database path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATABASE_PATH`].
pub fn database_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn database_path_falls_back_to_default() {
        assert_eq!(
            database_path_from_env_value(None),
            PathBuf::from(DEFAULT_DATABASE_PATH)
        );
        assert_eq!(
            database_path_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATABASE_PATH)
        );
        assert_eq!(
            database_path_from_env_value(Some(" /data/pacientes.db ".into())),
            PathBuf::from("/data/pacientes.db")
        );
    }

    #[test]
    fn new_rejects_directory_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = CoreConfig::new(temp_dir.path().to_path_buf())
            .expect_err("a directory is not a database file");
        assert!(matches!(err, PatientError::InvalidConfig(_)));
    }

    #[test]
    fn new_rejects_empty_path() {
        let err = CoreConfig::new(PathBuf::new()).expect_err("empty path should fail");
        assert!(matches!(err, PatientError::InvalidConfig(_)));
    }

    #[test]
    fn new_accepts_file_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("records.db");
        let cfg = CoreConfig::new(path.clone()).expect("file path should be accepted");
        assert_eq!(cfg.database_path(), path.as_path());
    }
}
