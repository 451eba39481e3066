//! Application Module - MVU Controller
//!
//! This module implements the Controller layer of the MVU architecture.
//! It coordinates between the view layer (pages) and the session worker
//! thread that owns the room connection.
//!
//! # Structure
//!
//! - `state.rs`: Application state definition and MVU loop
//! - `ui_handler.rs`: Command dispatcher for UI actions
//! - `handlers/`: Domain-specific UI command handlers
//!   - `media_handlers.rs`: Camera and microphone toggles
//!   - `background_handlers.rs`: Settings menu and background effects
//!   - `session_handlers.rs`: Reconnect and leave
//! - `session_handler.rs`: Processes events from the session worker
//!
//! # Communication Flow
//!
//! ```text
//! View (pages) --> UiCommand --> ui_handler --> handlers/* --> State mutation
//!                                                          \--> SessionCommand --> Session worker
//!
//! Session worker --> SessionEvent --> session_handler --> State update (phase, roster, textures)
//! ```

mod handlers;
mod session_handler;
mod state;
mod ui_handler;

pub use state::App;
