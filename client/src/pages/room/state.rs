//! Room State Management
//!
//! Per-room view state. The room connection itself lives in the session
//! worker thread, not here.

use egui::TextureHandle;

/// View state for the room (video textures only)
pub struct RoomState {
    pub local_texture: Option<TextureHandle>,
}

impl RoomState {
    /// Creates a new empty RoomState
    pub fn new() -> Self {
        Self {
            local_texture: None,
        }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}
