//! Session Worker
//!
//! Runs the room connection on its own thread: the bootstrap sequence,
//! the subscription policy, the background effect pipeline and the
//! command loop. The UI talks to it exclusively through channels.

mod policy;
mod utils;
mod worker;

pub use worker::{SessionConfig, SessionWorker};
