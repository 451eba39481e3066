//! Room Page

pub mod components;
mod state;

pub use state::RoomState;

use egui::TextureHandle;

use crate::events::UiCommand;
use crate::models::{ConnectionPhase, ParticipantEntry};

/// Parameters for rendering the room view
pub struct RoomViewParams<'a> {
    pub connection: &'a ConnectionPhase,
    pub local_texture: Option<&'a TextureHandle>,
    pub participants: &'a [ParticipantEntry],
    pub camera_enabled: bool,
    pub mic_muted: bool,
    pub settings_enabled: bool,
}

pub struct RoomPage;

impl RoomPage {
    pub fn show(ui: &mut egui::Ui, params: RoomViewParams<'_>) -> Option<UiCommand> {
        let mut command = None;

        ui.vertical(|ui| {
            ui.add_space(20.0);
            if let Some(header_cmd) =
                components::render_header(ui, params.connection, params.settings_enabled)
            {
                command = Some(header_cmd);
            }

            ui.add_space(30.0);
            components::render_video_grid(
                ui,
                params.local_texture,
                params.camera_enabled,
                params.participants.first(),
            );
            ui.add_space(20.0);

            if let Some(control_cmd) = components::render_controls(
                ui,
                params.connection,
                params.camera_enabled,
                params.mic_muted,
            ) {
                command = Some(control_cmd);
            }
        });

        command
    }
}
