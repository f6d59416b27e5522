//! Error types for togglenote.
//!
//! Library crates use [`TogglenoteError`] via `thiserror`.
//! The server binary wraps this with `color-eyre` for startup diagnostics.

use std::path::PathBuf;

/// Top-level error type for all togglenote operations.
#[derive(Debug, thiserror::Error)]
pub enum TogglenoteError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Caller input was malformed or incomplete.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Transport-level failure talking to a remote service.
    #[error("network error: {0}")]
    Network(String),

    /// The Notion API answered with a non-success status.
    #[error("notion API error (HTTP {status}): {message}")]
    Notion { status: u16, message: String },

    /// A remote payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// No toggle with the requested title exists under the root block.
    #[error("toggle list with name \"{name}\" not found")]
    SectionNotFound { name: String },

    /// Chat-completion classification failed.
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TogglenoteError>;

impl TogglenoteError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures of the remote service itself (transport, status, payload).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Notion { .. } | Self::Decode(_)
        )
    }
}
