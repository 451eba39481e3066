//! UI Command Handler - Command Dispatcher
//!
//! Central dispatcher routing UI commands to domain-specific handlers.

use super::state::App;
use crate::events::UiCommand;

impl App {
    /// Routes a command from the view to its handler
    pub(super) fn handle_ui_command(&mut self, command: UiCommand) {
        self.logger
            .debug(&format!("[UI] Handling command: {:?}", command));

        match command {
            // --- Media controls ---
            UiCommand::ToggleCamera => self.handle_toggle_camera(),
            UiCommand::ToggleMicrophone => self.handle_toggle_microphone(),

            // --- Session lifecycle ---
            UiCommand::Reconnect => self.handle_reconnect(),
            UiCommand::LeaveRoom => self.handle_leave_room(),

            // --- Settings menu ---
            UiCommand::OpenSettings => self.handle_open_settings(),
            UiCommand::CloseSettings => self.handle_close_settings(),
            UiCommand::SelectBackground(selection) => self.handle_select_background(selection),
        }
    }
}
