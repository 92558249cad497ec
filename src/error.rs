//! Error types and Result aliases for shellwrap
//!
//! User-facing failures (bad paths, wrong argument counts, spawn failures)
//! are rendered through `Display` into Error-kind lines by the shell, so the
//! messages here are what the user reads.

use std::path::PathBuf;

/// Result type alias for shellwrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for shellwrap
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Path errors ===
    /// Path could not be resolved literally or against the working directory
    #[error("Directory not found: {path}")]
    PathNotFound { path: String },

    /// `view` target is missing or not a regular file
    #[error("Cannot find image: {path}")]
    ImageNotFound { path: String },

    /// Path exists but is not a directory
    #[error("Cannot change directory: '{path}' is not a directory")]
    NotADirectory { path: String },

    /// Initial working directory is unusable
    #[error("Invalid working directory '{}': {reason}", path.display())]
    InvalidWorkingDirectory { path: PathBuf, reason: String },

    // === Command errors ===
    /// Built-in invoked with the wrong number of arguments
    #[error("{usage}")]
    InvalidArguments { command: String, usage: String },

    /// Failed to launch the child process
    #[error("Failed to spawn command '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    /// A piped stdio handle was not available after spawn
    #[error("Failed to capture {stream} of child process")]
    StreamUnavailable { stream: &'static str },

    // === Signal errors ===
    /// Failed to deliver a signal to a child process
    #[error("Failed to send signal '{signal}': {reason}")]
    SignalSendFailed { signal: String, reason: String },

    /// Signal handling is not available on this platform
    #[error("Signal '{signal}' not supported on {platform}")]
    SignalNotSupported { signal: String, platform: String },

    // === Configuration errors ===
    /// No configuration file found in any search path
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Failed to read a configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Failed to parse a configuration file
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Configuration value out of range
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    // === I/O ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
