//! Room Header Component
//!
//! Displays the room name, the connection status, and the settings
//! button when the settings menu is enabled.

use egui::{Color32, FontId, RichText};

use crate::events::UiCommand;
use crate::models::ConnectionPhase;

/// Renders the room header; returns a command when the settings button
/// is clicked
pub fn render_header(
    ui: &mut egui::Ui,
    connection: &ConnectionPhase,
    settings_enabled: bool,
) -> Option<UiCommand> {
    let mut command = None;

    ui.horizontal(|ui| {
        ui.add_space(20.0);
        render_room_title(ui, connection);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(20.0);
            if settings_enabled && render_settings_button(ui) {
                command = Some(UiCommand::OpenSettings);
            }
            ui.add_space(10.0);
            render_status_label(ui, connection);
        });
    });

    command
}

/// Renders the room title
fn render_room_title(ui: &mut egui::Ui, connection: &ConnectionPhase) {
    let title = match connection {
        ConnectionPhase::Connected { room_name } => format!("Room: {}", room_name),
        _ => "MeetRTC".to_string(),
    };
    ui.label(
        RichText::new(title)
            .font(FontId::proportional(32.0))
            .color(Color32::WHITE),
    );
}

/// Renders the settings button; returns whether it was clicked
fn render_settings_button(ui: &mut egui::Ui) -> bool {
    ui.button(
        RichText::new("⚙")
            .font(FontId::proportional(24.0))
            .color(Color32::WHITE),
    )
    .on_hover_text("Settings")
    .clicked()
}

/// Renders the connection status label
fn render_status_label(ui: &mut egui::Ui, connection: &ConnectionPhase) {
    let color = match connection {
        ConnectionPhase::Connected { .. } => Color32::from_rgb(34, 197, 94),
        ConnectionPhase::Failed { .. } => Color32::from_rgb(239, 68, 68),
        _ => Color32::LIGHT_GRAY,
    };
    ui.label(
        RichText::new(connection.status_text())
            .font(FontId::proportional(18.0))
            .color(color),
    );
}
