//! Core error types for focusflow-core.
//!
//! This module defines the error hierarchy using thiserror. None of these
//! errors is fatal to a running session: callers degrade to defaults or
//! treat the failed operation as a no-op.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted state errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Focus session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors raised by the persistence channel and the state document codec.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the state document
    #[error("Failed to read state from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the state document
    #[error("Failed to write state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong field types
    #[error("Failed to parse state document: {0}")]
    ParseFailed(#[from] serde_json::Error),

    /// The document root is not a JSON object
    #[error("Malformed state document: {0}")]
    Malformed(String),

    /// The document was written by a newer schema than this build knows
    #[error("Unsupported state schema version {found} (newest supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// In-memory or test backends report failures through this variant
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
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

    /// Unknown dotted key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task description was empty or whitespace only
    #[error("Task description must not be empty")]
    EmptyDescription,

    /// A task with this id does not exist
    #[error("Task not found: {0}")]
    UnknownTask(String),

    /// Focus sessions need a positive duration
    #[error("Task '{0}' has no estimated time")]
    ZeroDuration(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Focus session errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Sessions cannot be bound to a completed task
    #[error("Task '{0}' is already completed")]
    TaskAlreadyCompleted(String),

    /// The session reached its terminal state
    #[error("Focus session is already completed")]
    SessionCompleted,

    /// No session is bound
    #[error("No active focus session")]
    NoActiveSession,

    /// Burnout relief was requested while no prompt is pending
    #[error("No burnout prompt is pending")]
    NoPendingPrompt,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
