//! Settings Menu and Background Effect Handlers

use crate::app::state::App;
use crate::events::SessionCommand;
use crate::models::BackgroundSelection;

impl App {
    /// Opens the settings menu and refreshes the effect selection from
    /// the worker, so the menu shows what is actually running.
    pub(in crate::app) fn handle_open_settings(&mut self) {
        self.settings_open = true;
        self.session.send(SessionCommand::QueryBackground);
    }

    pub(in crate::app) fn handle_close_settings(&mut self) {
        self.settings_open = false;
    }

    /// Forwards the choice to the worker. The highlighted selection only
    /// moves when the worker confirms the apply.
    pub(in crate::app) fn handle_select_background(&mut self, selection: BackgroundSelection) {
        if !self.connection.is_connected() {
            self.logger
                .warn("[BACKGROUND] Not connected, selection ignored");
            return;
        }

        self.logger
            .info(&format!("[BACKGROUND] Selected {}", selection.label()));
        self.session.send(SessionCommand::ApplyBackground(selection));
    }
}
