//! Room UI Components
//!
//! This module contains the UI components of the Room page.
//! Each component is in its own file for better organization.

mod controls;
mod header;
mod settings_menu;
mod video_grid;
mod video_placeholder;

pub use controls::render_controls;
pub use header::render_header;
pub use settings_menu::{SettingsMenuParams, render_settings_menu};
pub use video_grid::render_video_grid;
