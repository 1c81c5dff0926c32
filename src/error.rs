//! Error types for media catalog operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! storage layer, file handling and CLI commands.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for catalog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Storage-specific errors for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Catalog tables are missing (init command not run).
    #[error("catalog not initialized. Run: media-catalog init")]
    NotInitialized,

    /// Table name outside the known set.
    #[error("unknown table: {name}")]
    UnknownTable {
        /// Name that was rejected.
        name: String,
    },

    /// Column name outside the known set, or not part of the table.
    #[error("unknown column '{column}' for table '{table}'")]
    UnknownColumn {
        /// Table the column was requested on.
        table: String,
        /// Column that was rejected.
        column: String,
    },

    /// The name given for a classification row is not the stored one.
    #[error("{table} row {id} is named '{stored}', not '{given}'")]
    NameMismatch {
        /// Classification table.
        table: String,
        /// Row id.
        id: i64,
        /// Name supplied by the caller.
        given: String,
        /// Name stored in the row.
        stored: String,
    },

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A row with the same natural key already exists.
    #[error("already exists: {0}")]
    Duplicate(String),

    /// Referenced row was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotInitialized;
        assert_eq!(
            err.to_string(),
            "catalog not initialized. Run: media-catalog init"
        );

        let err = StorageError::UnknownColumn {
            table: "genres".to_string(),
            column: "title".to_string(),
        };
        assert_eq!(err.to_string(), "unknown column 'title' for table 'genres'");

        let err = StorageError::UnknownTable {
            name: "sqlite_master".to_string(),
        };
        assert!(err.to_string().contains("sqlite_master"));
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::Duplicate("title 'Dune'".to_string());
        assert_eq!(err.to_string(), "already exists: title 'Dune'");

        let err = CommandError::InvalidArgument("empty title".to_string());
        assert!(err.to_string().contains("invalid argument"));
    }

    #[test]
    fn test_io_error_display() {
        let err = IoError::DirectoryFailed {
            path: "/tmp/dir".to_string(),
            reason: "exists".to_string(),
        };
        assert!(err.to_string().contains("directory"));
        assert!(err.to_string().contains("/tmp/dir"));
    }

    #[test]
    fn test_error_config() {
        let err = Error::Config {
            message: "bad page size".to_string(),
        };
        assert_eq!(err.to_string(), "configuration error: bad page size");
    }

    #[test]
    fn test_error_from_storage() {
        let err: Error = StorageError::NotInitialized.into();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_error_from_command() {
        let err: Error = CommandError::NotFound("id 4".to_string()).into();
        assert!(matches!(err, Error::Command(_)));
    }

    #[test]
    fn test_from_rusqlite_error_to_error() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: Error = rusqlite_err.into();
        assert!(matches!(err, Error::Storage(StorageError::Database(_))));
    }

    #[test]
    fn test_from_rusqlite_error_to_storage_error() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: StorageError = rusqlite_err.into();
        assert!(matches!(err, StorageError::Database(_)));
    }
}
