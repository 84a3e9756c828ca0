//! Error types for healthdocs.
//!
//! This module defines all error types used throughout the healthdocs crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for healthdocs operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// Writing the document collection to the backend failed.
    #[error("failed to persist '{key}': {source}")]
    Persistence {
        /// Storage key that was being written.
        key: String,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    /// Stored content could not be decoded as a document collection.
    #[error("stored data under '{key}' is corrupt: {message}")]
    CorruptData {
        /// Storage key that was read.
        key: String,
        /// Description of the decoding failure.
        message: String,
    },

    /// The backend has no room for the value being written.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Total bytes the backend would hold after the write.
        needed: usize,
        /// Configured capacity in bytes.
        limit: usize,
    },

    /// A record with this id is already stored.
    #[error("a document with id '{0}' already exists")]
    DuplicateId(String),

    /// No record with this id is stored.
    #[error("no document with id '{0}'")]
    NotFound(String),

    /// A candidate document failed validation.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the validation failure.
        message: String,
    },

    /// A category label is not one of the fixed categories.
    #[error("unknown document category: {0}")]
    UnknownCategory(String),

    // === Database Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for healthdocs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Wrap a backend failure as a persistence error for `key`.
    #[must_use]
    pub fn persistence(key: impl Into<String>, source: Error) -> Self {
        Self::Persistence {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Create a corrupt data error.
    #[must_use]
    pub fn corrupt_data(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptData {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid document error.
    #[must_use]
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from a failed write to storage.
    #[must_use]
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Check if this error reports corrupt stored data.
    #[must_use]
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Self::CorruptData { .. })
    }
}
