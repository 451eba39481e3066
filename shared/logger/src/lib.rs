//! Non-blocking file logging shared by every crate in the workspace.
//!
//! Log calls never touch the disk on the caller's thread: records are sent
//! over a channel to a dedicated writer thread that appends to the log file.

pub mod error;
mod level;
mod logger;
mod record;
mod writer;

pub use error::{LoggingError, Result};
pub use level::LogLevel;
pub use logger::Logger;
