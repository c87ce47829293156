//! Error handling module for hardenkit
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Fatal and tolerated failures are separated by the callers, not by this type:
//! the disk configurator propagates every `CommandFailed`, while the fetcher
//! turns per-item failures into report entries.

use thiserror::Error;

/// Main error type for hardenkit
#[derive(Error, Debug)]
pub enum HardenError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A program could not be started at all
    #[error("Failed to start `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A program ran and exited non-zero (or was killed by a signal)
    #[error("Command `{command}` failed with exit code {}", exit_label(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Prompt input closed or unreadable
    #[error("Input error: {0}")]
    Input(String),

    /// Menu selection could not be parsed
    #[error("Invalid selection: {0}")]
    Selection(String),

    /// HTTP transport errors (request could not be built or sent)
    #[error("HTTP error: {0}")]
    Http(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (killed by signal)".to_string(),
    }
}

/// Result type alias for hardenkit operations
pub type Result<T> = std::result::Result<T, HardenError>;

// Convenient error constructors
impl HardenError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a selection error
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// True for failures of an external program (spawn or exit status).
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandSpawn { .. } | Self::CommandFailed { .. })
    }
}
