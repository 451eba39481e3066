//! Room Control Buttons
//!
//! Camera toggle, microphone toggle, reconnect, and leave room buttons.

use egui::Vec2;

use crate::components::{Button, ButtonVariant};
use crate::events::UiCommand;
use crate::models::ConnectionPhase;

/// Renders the control button row, centered under the video grid
pub fn render_controls(
    ui: &mut egui::Ui,
    connection: &ConnectionPhase,
    camera_enabled: bool,
    mic_muted: bool,
) -> Option<UiCommand> {
    let mut command = None;
    let connected = connection.is_connected();
    let show_reconnect = matches!(
        connection,
        ConnectionPhase::Failed { .. } | ConnectionPhase::Disconnected
    );

    ui.horizontal(|ui| {
        let button_count = if show_reconnect { 4.0 } else { 3.0 };
        let controls_width = button_count * 170.0 + (button_count - 1.0) * 20.0;
        let margin = (ui.available_width() - controls_width) / 2.0;
        ui.add_space(margin.max(0.0));

        if let Some(cmd) = render_camera_toggle(ui, camera_enabled, connected) {
            command = Some(cmd);
        }

        if let Some(cmd) = render_microphone_toggle(ui, mic_muted, connected) {
            command = Some(cmd);
        }

        if show_reconnect && render_reconnect_button(ui) {
            command = Some(UiCommand::Reconnect);
        }

        if render_leave_button(ui, connected) {
            command = Some(UiCommand::LeaveRoom);
        }
    });

    command
}

/// Renders the camera toggle button
fn render_camera_toggle(ui: &mut egui::Ui, camera_enabled: bool, connected: bool) -> Option<UiCommand> {
    let (button_text, button_variant) = get_camera_button_config(camera_enabled);

    let clicked = Button::new(button_text)
        .variant(button_variant)
        .min_size(Vec2::new(170.0, 50.0))
        .enabled(connected)
        .show(ui)
        .clicked();

    ui.add_space(20.0);

    clicked.then_some(UiCommand::ToggleCamera)
}

/// Gets the button text and variant based on camera state
fn get_camera_button_config(camera_enabled: bool) -> (&'static str, ButtonVariant) {
    if camera_enabled {
        ("🎥 Turn Off Camera", ButtonVariant::Secondary)
    } else {
        ("🎥 Turn On Camera", ButtonVariant::Primary)
    }
}

/// Renders the microphone toggle button
fn render_microphone_toggle(ui: &mut egui::Ui, mic_muted: bool, connected: bool) -> Option<UiCommand> {
    let (button_text, button_variant) = get_microphone_button_config(mic_muted);

    let clicked = Button::new(button_text)
        .variant(button_variant)
        .min_size(Vec2::new(170.0, 50.0))
        .enabled(connected)
        .show(ui)
        .clicked();

    ui.add_space(20.0);

    clicked.then_some(UiCommand::ToggleMicrophone)
}

/// Gets the button text and variant based on mute state
fn get_microphone_button_config(mic_muted: bool) -> (&'static str, ButtonVariant) {
    if mic_muted {
        ("🔇 Unmute", ButtonVariant::Warning)
    } else {
        ("🔊 Mute", ButtonVariant::Secondary)
    }
}

/// Renders the reconnect button; returns whether it was clicked
fn render_reconnect_button(ui: &mut egui::Ui) -> bool {
    let clicked = Button::new("Reconnect")
        .variant(ButtonVariant::Primary)
        .min_size(Vec2::new(170.0, 50.0))
        .show(ui)
        .clicked();

    ui.add_space(20.0);
    clicked
}

/// Renders the leave room button; returns whether it was clicked
fn render_leave_button(ui: &mut egui::Ui, connected: bool) -> bool {
    Button::new("Leave Room")
        .variant(ButtonVariant::Danger)
        .min_size(Vec2::new(170.0, 50.0))
        .enabled(connected)
        .show(ui)
        .clicked()
}
