//! Core error types for napwise-core.
//!
//! The schedule generator itself never fails; these errors cover the layer
//! around it (row store, configuration, calendar export, input validation).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for napwise-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Row store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar export errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Row store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded into its record type
    #[error("Corrupt row {table}/{key}: {message}")]
    CorruptRow {
        table: String,
        key: String,
        message: String,
    },

    /// Database is locked
    #[error("Store is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Calendar export errors.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// No calendar token stored
    #[error("Not connected to a calendar; run `napwise calendar connect` first")]
    NotConnected,

    /// Token lookup in the credential store failed
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The calendar API answered with an error status
    #[error("Calendar API rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The calendar API answered without an event id
    #[error("Calendar API response missing event id")]
    MissingEventId,
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Unparsable clock time
    #[error("Invalid time '{0}': expected HH:MM (24-hour)")]
    InvalidTime(String),

    /// Constraint name outside the fixed vocabulary
    #[error("Unknown constraint '{0}'")]
    UnknownConstraint(String),

    /// Nap slot other than 1 or 2
    #[error("Invalid nap number {0}: expected 1 or 2")]
    InvalidNap(u8),

    /// Empty value where one is required
    #[error("Empty value for '{0}'")]
    Empty(String),

    /// The child's own name cannot be used as a caregiver
    #[error("'{0}' is the child's name and cannot be a caregiver")]
    ReservedName(String),

    /// Access gate rejected the passphrase
    #[error("Passphrase rejected")]
    AccessDenied,

    /// Record lookup failed
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(StoreError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
