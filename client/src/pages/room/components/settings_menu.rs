//! Settings Menu Component
//!
//! Modal window with the background picker, device toggles and a
//! read-only summary of the current session.

use egui::{Align2, Color32, FontId, RichText, Vec2};
use roomkit::VideoCodec;

use crate::components::{Button, ButtonVariant};
use crate::events::UiCommand;
use crate::models::{BackgroundImage, BackgroundSelection, BackgroundType, ConnectionPhase};

/// Everything the settings menu needs from application state
pub struct SettingsMenuParams<'a> {
    pub selected: &'a BackgroundSelection,
    pub images: &'a [BackgroundImage],
    pub camera_enabled: bool,
    pub mic_muted: bool,
    pub connection: &'a ConnectionPhase,
    pub encryption_enabled: Option<bool>,
    pub video_codec: VideoCodec,
    pub participant_count: usize,
}

/// Renders the settings window and returns any command the user triggered
pub fn render_settings_menu(
    ctx: &egui::Context,
    params: SettingsMenuParams<'_>,
) -> Option<UiCommand> {
    let mut command = None;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([420.0, 360.0])
        .show(ctx, |ui| {
            if let Some(cmd) = render_background_section(ui, params.selected, params.images) {
                command = Some(cmd);
            }

            ui.separator();

            if let Some(cmd) = render_media_section(ui, params.camera_enabled, params.mic_muted) {
                command = Some(cmd);
            }

            ui.separator();

            render_session_section(ui, &params);

            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                let close = Button::new("Close")
                    .variant(ButtonVariant::Secondary)
                    .min_size(Vec2::new(120.0, 35.0))
                    .show(ui);
                if close.clicked() {
                    command = Some(UiCommand::CloseSettings);
                }
            });
        });

    command
}

/// Renders the background effect picker
fn render_background_section(
    ui: &mut egui::Ui,
    selected: &BackgroundSelection,
    images: &[BackgroundImage],
) -> Option<UiCommand> {
    let mut command = None;

    render_heading(ui, "Background Effect");

    let none_active = selected.background == BackgroundType::None;
    if ui.selectable_label(none_active, "None").clicked() {
        command = Some(UiCommand::SelectBackground(BackgroundSelection::none()));
    }

    let blur_active = selected.background == BackgroundType::Blur;
    if ui.selectable_label(blur_active, "Blur").clicked() {
        command = Some(UiCommand::SelectBackground(BackgroundSelection::blur()));
    }

    for image in images {
        let active = selected.background == BackgroundType::Image
            && selected.image_path.as_deref() == Some(image.path.as_path());
        if ui.selectable_label(active, image.name.as_str()).clicked() {
            command = Some(UiCommand::SelectBackground(BackgroundSelection::image(
                image.path.clone(),
            )));
        }
    }

    if images.is_empty() {
        ui.label(
            RichText::new("No background images found")
                .font(FontId::proportional(13.0))
                .color(Color32::GRAY),
        );
    }

    command
}

/// Renders the camera and microphone toggles
fn render_media_section(
    ui: &mut egui::Ui,
    camera_enabled: bool,
    mic_muted: bool,
) -> Option<UiCommand> {
    let mut command = None;

    render_heading(ui, "Devices");

    ui.horizontal(|ui| {
        let camera_label = if camera_enabled {
            "Disable Camera"
        } else {
            "Enable Camera"
        };
        let camera = Button::new(camera_label)
            .variant(ButtonVariant::Secondary)
            .min_size(Vec2::new(150.0, 35.0))
            .show(ui);
        if camera.clicked() {
            command = Some(UiCommand::ToggleCamera);
        }

        ui.add_space(10.0);

        let mic_label = if mic_muted {
            "Unmute Microphone"
        } else {
            "Mute Microphone"
        };
        let microphone = Button::new(mic_label)
            .variant(ButtonVariant::Secondary)
            .min_size(Vec2::new(150.0, 35.0))
            .show(ui);
        if microphone.clicked() {
            command = Some(UiCommand::ToggleMicrophone);
        }
    });

    command
}

/// Renders the read-only session summary
fn render_session_section(ui: &mut egui::Ui, params: &SettingsMenuParams<'_>) {
    render_heading(ui, "Session");

    render_info_row(ui, "Status", &params.connection.status_text());

    // Count includes the local participant.
    let participants = (params.participant_count + 1).to_string();
    render_info_row(ui, "Participants", &participants);

    let encryption = match params.encryption_enabled {
        Some(true) => "End-to-end encrypted",
        Some(false) => "Not encrypted",
        None => "Pending...",
    };
    render_info_row(ui, "Encryption", encryption);

    render_info_row(ui, "Video codec", params.video_codec.as_str());
}

/// Renders a section heading
fn render_heading(ui: &mut egui::Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .font(FontId::proportional(18.0))
            .color(Color32::WHITE),
    );
    ui.add_space(5.0);
}

/// Renders a label/value pair
fn render_info_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("{label}:"))
                .font(FontId::proportional(14.0))
                .color(Color32::LIGHT_GRAY),
        );
        ui.label(
            RichText::new(value)
                .font(FontId::proportional(14.0))
                .color(Color32::WHITE),
        );
    });
}
