//! Core error types for dailystreak-core.
//!
//! Computation in the engine is total and never fails; the errors here come
//! from the task store, configuration handling and input validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dailystreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Task store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open task store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("Task store is locked")]
    Locked,

    /// No task with the given id
    #[error("Task not found: {0}")]
    NotFound(String),

    /// The task changed between read and conditional write
    #[error("Task {task_id} was modified concurrently (expected revision {expected})")]
    Conflict { task_id: String, expected: i64 },
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task titles must contain something other than whitespace
    #[error("Task title must not be empty")]
    EmptyTitle,

    /// Recurrence tag outside daily/weekly/monthly
    #[error("Invalid recurrence '{0}': expected daily, weekly or monthly")]
    InvalidRecurrence(String),

    /// Analytics window must cover between one day and `MAX_WINDOW_DAYS`
    #[error(
        "Invalid window of {0} days: must be between 1 and {max}",
        max = crate::date_window::MAX_WINDOW_DAYS
    )]
    InvalidWindow(usize),

    /// Day boundary offset must stay within a day of UTC
    #[error("Invalid UTC offset of {0} minutes: must be within ±1439")]
    InvalidUtcOffset(i32),

    /// Tier table does not partition the non-negative integers
    #[error("Malformed tier catalog: {0}")]
    MalformedTierCatalog(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _msg) => {
                if failure.code == rusqlite::ErrorCode::DatabaseBusy
                    || failure.code == rusqlite::ErrorCode::DatabaseLocked
                {
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
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
