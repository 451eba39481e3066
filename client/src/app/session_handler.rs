//! Handles events from the session worker thread.

use super::state::App;
use crate::events::SessionEvent;
use crate::models::{ConnectionPhase, ParticipantEntry};

impl App {
    /// Processes events from the session worker
    /// Updates application state based on room progress
    pub(super) fn handle_session_event(&mut self, ctx: &egui::Context, event: SessionEvent) {
        match event {
            SessionEvent::EncryptionReady { enabled } => {
                self.encryption_enabled = Some(enabled);
            }

            SessionEvent::Connected { room_name } => {
                self.logger
                    .info(&format!("[APP] Session connected to {}", room_name));
                self.connection = ConnectionPhase::Connected { room_name };
            }

            SessionEvent::ConnectFailed { step, error } => {
                self.connection = ConnectionPhase::Failed { step, error };
            }

            SessionEvent::ParticipantJoined { identity, name } => {
                self.upsert_participant(identity, name);
            }

            SessionEvent::ParticipantLeft { identity } => {
                self.participants.retain(|p| p.identity != identity);
            }

            SessionEvent::TrackPublished { participant, kind } => {
                self.logger.debug(&format!(
                    "[APP] {} published {} track",
                    participant,
                    kind.as_str()
                ));
            }

            SessionEvent::LocalFrame(image) => {
                self.update_local_texture(ctx, image);
            }

            SessionEvent::CameraState { enabled } => {
                self.camera_enabled = enabled;
                if !enabled {
                    self.room_state.local_texture = None;
                }
            }

            SessionEvent::MicrophoneState { muted } => {
                self.mic_muted = muted;
            }

            SessionEvent::BackgroundApplied(selection)
            | SessionEvent::CurrentBackground(selection) => {
                self.selected_background = selection;
            }

            SessionEvent::Disconnected => {
                // Failed stays on screen; only a live session transitions
                // to the disconnected phase.
                if self.connection.is_connected() {
                    self.connection = ConnectionPhase::Disconnected;
                }
                self.room_state.local_texture = None;
            }
        }
    }

    /// The sweep and the join events may both announce a participant;
    /// the roster keeps one entry per identity.
    fn upsert_participant(&mut self, identity: String, name: String) {
        match self.participants.iter_mut().find(|p| p.identity == identity) {
            Some(entry) => entry.name = name,
            None => self.participants.push(ParticipantEntry { identity, name }),
        }
    }

    /// Uploads the preview frame, reusing the texture when one exists.
    fn update_local_texture(&mut self, ctx: &egui::Context, image: egui::ColorImage) {
        match &mut self.room_state.local_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::default()),
            None => {
                self.room_state.local_texture =
                    Some(ctx.load_texture("local_preview", image, egui::TextureOptions::default()));
            }
        }
    }
}
