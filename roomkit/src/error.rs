//! Error type shared by every roomkit operation.

use std::fmt;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RoomError>;

/// Failures surfaced by room operations.
#[derive(Debug)]
pub enum RoomError {
    /// The operation is not valid in the room's current lifecycle state.
    InvalidState(String),
    /// E2EE setup failed (missing options, missing key, derivation error).
    Encryption(String),
    /// The operation needs a connected session.
    NotConnected,
    /// No publication with the given sid exists in the room.
    UnknownTrack(String),
    /// The backend rejected or failed the operation.
    Backend(String),
    /// A track processor failed while transforming a frame.
    Processor(String),
    /// A frame buffer did not match its declared dimensions.
    InvalidFrame(String),
    /// An internal lock was poisoned by a panicking thread.
    LockPoisoned,
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            RoomError::Encryption(msg) => write!(f, "encryption error: {}", msg),
            RoomError::NotConnected => write!(f, "not connected to a room"),
            RoomError::UnknownTrack(sid) => write!(f, "unknown track: {}", sid),
            RoomError::Backend(msg) => write!(f, "backend error: {}", msg),
            RoomError::Processor(msg) => write!(f, "processor error: {}", msg),
            RoomError::InvalidFrame(msg) => write!(f, "invalid frame: {}", msg),
            RoomError::LockPoisoned => write!(f, "internal lock poisoned"),
        }
    }
}

impl std::error::Error for RoomError {}
