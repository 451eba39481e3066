//! Video Tile Placeholders
//!
//! Shown in place of a live video stream: a plain message tile for
//! camera-off and empty seats, and an avatar tile for participants
//! whose video is intentionally not subscribed.

use egui::{Color32, FontId, RichText, Vec2};

const TILE_FILL: Color32 = Color32::from_rgb(45, 55, 72);
const AVATAR_COLOR: Color32 = Color32::from_rgb(96, 165, 250);

/// Renders a placeholder box with a centered message
pub(super) fn render_placeholder(ui: &mut egui::Ui, width: f32, height: f32, text: &str) {
    tile(ui, width, height, |ui| {
        ui.add_space(height / 2.0 - 20.0);
        ui.label(
            RichText::new(text)
                .font(FontId::proportional(20.0))
                .color(Color32::GRAY),
        );
    });
}

/// Renders an avatar tile: the first letter of the display name above
/// a caption, for audio-only participants
pub(super) fn render_avatar_tile(
    ui: &mut egui::Ui,
    width: f32,
    height: f32,
    name: &str,
    caption: &str,
) {
    let initial: String = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string());

    tile(ui, width, height, |ui| {
        ui.add_space(height / 2.0 - 56.0);
        ui.label(
            RichText::new(initial)
                .font(FontId::proportional(64.0))
                .color(AVATAR_COLOR),
        );
        ui.add_space(8.0);
        ui.label(
            RichText::new(caption)
                .font(FontId::proportional(16.0))
                .color(Color32::GRAY),
        );
    });
}

/// Common tile chrome shared by both placeholder kinds
fn tile(ui: &mut egui::Ui, width: f32, height: f32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(TILE_FILL)
        .corner_radius(8.0)
        .show(ui, |ui| {
            ui.set_min_size(Vec2::new(width, height));
            ui.vertical_centered(add_contents);
        });
}
