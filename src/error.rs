//! Error types for the nisurf library and CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // File system errors
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid directory pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    // BIDS / FreeSurfer errors
    #[error("Invalid sidecar {}: {message}", .path.display())]
    Sidecar { path: PathBuf, message: String },

    #[error("Session ID file error: {0}")]
    SessionFile(String),

    #[error("{0} subject(s) failed")]
    SubjectsFailed(usize),

    // External command errors
    #[error("Failed to start command '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} command(s) exited with a non-zero status")]
    CommandFailed(usize),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes for the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const DATASET_ERROR: i32 = 3;
    pub const COMMAND_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
