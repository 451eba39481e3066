//! UI Command Handlers
//!
//! This module organizes UI command handlers by domain.
//! Each submodule implements handlers for App via `impl` blocks.

mod background_handlers;
mod media_handlers;
mod session_handlers;
