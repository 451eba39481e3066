//! Camera and Microphone Handlers
//!
//! Both toggles go through the session worker; the flags in the app
//! state only change when the worker confirms with a state event.

use crate::app::state::App;
use crate::events::SessionCommand;

impl App {
    /// Toggles the camera for the local participant
    pub(in crate::app) fn handle_toggle_camera(&mut self) {
        if !self.connection.is_connected() {
            self.logger.warn("[CAMERA] Not connected, toggle ignored");
            return;
        }

        let target = !self.camera_enabled;
        self.logger
            .info(&format!("[CAMERA] Requesting camera enabled = {}", target));
        self.session.send(SessionCommand::SetCameraEnabled(target));
    }

    /// Toggles the microphone mute for the local participant
    pub(in crate::app) fn handle_toggle_microphone(&mut self) {
        if !self.connection.is_connected() {
            self.logger.warn("[AUDIO] Not connected, toggle ignored");
            return;
        }

        let target = !self.mic_muted;
        self.logger
            .info(&format!("[AUDIO] Requesting microphone muted = {}", target));
        self.session.send(SessionCommand::SetMicrophoneMuted(target));
    }
}
