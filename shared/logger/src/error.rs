//! Error type for logger construction and writing.

use std::fmt;
use std::io;

/// Result alias used across the logging crate.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Failures that can occur while setting up or running the logger.
#[derive(Debug)]
pub enum LoggingError {
    /// The log file could not be opened or written.
    Io(io::Error),
    /// Any other logging failure.
    Logging(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::Io(err) => write!(f, "I/O error: {}", err),
            LoggingError::Logging(msg) => write!(f, "Logging error: {}", msg),
        }
    }
}

impl std::error::Error for LoggingError {}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> Self {
        LoggingError::Io(err)
    }
}
