//! Button Component
//!
//! Thin wrapper over [`egui::Button`] that applies the application
//! palette. Pages describe a button with the fluent API and never set
//! raw egui colors themselves.

use egui::{Color32, FontId, Response, RichText, Ui, Vec2};

/// Color role of a button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ButtonVariant {
    /// Main call to action, blue.
    Primary,
    /// Neutral action, gray.
    Secondary,
    /// Destructive action, red.
    Danger,
    /// Needs attention, amber.
    Warning,
}

impl ButtonVariant {
    fn fill(self) -> Color32 {
        match self {
            ButtonVariant::Primary => Color32::from_rgb(59, 130, 246),
            ButtonVariant::Secondary => Color32::from_rgb(107, 114, 128),
            ButtonVariant::Danger => Color32::from_rgb(239, 68, 68),
            ButtonVariant::Warning => Color32::from_rgb(245, 158, 11),
        }
    }

    /// White on the darker fills, near-black on amber.
    fn label_color(self) -> Color32 {
        match self {
            ButtonVariant::Warning => Color32::from_rgb(30, 30, 30),
            _ => Color32::WHITE,
        }
    }
}

/// Styled button built through a fluent API and shown with [`Button::show`].
pub struct Button {
    text: String,
    text_size: f32,
    min_size: Option<Vec2>,
    variant: ButtonVariant,
    enabled: bool,
}

impl Button {
    /// A primary button with the given label, 16pt text, natural size.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            text: label.into(),
            text_size: 16.0,
            min_size: None,
            variant: ButtonVariant::Primary,
            enabled: true,
        }
    }

    /// Sets the minimum size of the button
    pub fn min_size(mut self, size: Vec2) -> Self {
        self.min_size = Some(size);
        self
    }

    /// Sets the color role
    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the label text size
    pub fn text_size(mut self, size: f32) -> Self {
        self.text_size = size;
        self
    }

    /// Greys the button out when `enabled` is false
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Renders the button and returns the response
    pub fn show(self, ui: &mut Ui) -> Response {
        let label = RichText::new(self.text)
            .font(FontId::proportional(self.text_size))
            .color(self.variant.label_color());

        let mut button = egui::Button::new(label)
            .fill(self.variant.fill())
            .corner_radius(8.0);
        if let Some(size) = self.min_size {
            button = button.min_size(size);
        }

        ui.add_enabled(self.enabled, button)
    }
}
