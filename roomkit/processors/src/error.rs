//! Error types for processor construction.
//!
//! Runtime per-frame failures go through [`roomkit::RoomError`] (the
//! [`roomkit::TrackProcessor`] contract); this error covers the fallible
//! setup work, mainly loading background images from disk.

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Error type for building a processor
#[derive(Debug)]
pub enum ProcessorError {
    /// Image could not be read or decoded
    Image(String),
    /// I/O error
    Io(io::Error),
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorError::Image(msg) => write!(f, "Image error: {}", msg),
            ProcessorError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ProcessorError {}

impl From<io::Error> for ProcessorError {
    fn from(err: io::Error) -> Self {
        ProcessorError::Io(err)
    }
}
