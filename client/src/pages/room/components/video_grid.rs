//! Video Grid Component
//!
//! Two-column layout: the local camera preview on the left, the remote
//! participant on the right. Remote video stays a placeholder: the
//! subscription policy only pulls audio from other participants.

use egui::{Color32, FontId, RichText, TextureHandle};

use super::video_placeholder::{render_avatar_tile, render_placeholder};
use crate::models::ParticipantEntry;

/// Renders the 2-column video grid layout
pub fn render_video_grid(
    ui: &mut egui::Ui,
    local_texture: Option<&TextureHandle>,
    camera_enabled: bool,
    remote: Option<&ParticipantEntry>,
) {
    let available_width = ui.available_width();
    let video_width = (available_width - 60.0) / 2.0;
    let video_height = video_width * 0.75;

    ui.horizontal(|ui| {
        ui.add_space(20.0);
        render_local_video(ui, local_texture, camera_enabled, video_width, video_height);
        ui.add_space(20.0);
        render_remote_tile(ui, remote, video_width, video_height);
        ui.add_space(20.0);
    });
}

/// Renders the local preview with the active background effect
fn render_local_video(
    ui: &mut egui::Ui,
    local_texture: Option<&TextureHandle>,
    camera_enabled: bool,
    width: f32,
    height: f32,
) {
    ui.vertical(|ui| {
        ui.set_width(width);

        if camera_enabled {
            if let Some(texture) = local_texture {
                ui.image((texture.id(), egui::vec2(width, height)));
            } else {
                render_placeholder(ui, width, height, "Camera Starting...");
            }
        } else {
            render_placeholder(ui, width, height, "Camera Off");
        }

        ui.add_space(10.0);
        ui.label(
            RichText::new("You")
                .font(FontId::proportional(20.0))
                .color(Color32::WHITE),
        );
    });
}

/// Renders the remote participant tile
fn render_remote_tile(
    ui: &mut egui::Ui,
    remote: Option<&ParticipantEntry>,
    width: f32,
    height: f32,
) {
    ui.vertical(|ui| {
        ui.set_width(width);

        if let Some(participant) = remote {
            render_avatar_tile(ui, width, height, &participant.name, "Audio Only");
            ui.add_space(10.0);
            ui.label(
                RichText::new(&participant.name)
                    .font(FontId::proportional(20.0))
                    .color(Color32::WHITE),
            );
        } else {
            render_placeholder(ui, width, height, "Waiting for others to join...");
        }
    });
}
