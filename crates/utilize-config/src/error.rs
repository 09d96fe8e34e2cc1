//! Error types for utilize-config

use std::path::PathBuf;

/// Result type for utilize-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, parsing or writing configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed document syntax. `origin` is the file path or `<string>`.
    #[error("Failed to parse config {origin} at line {line}: {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(origin: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }
}
