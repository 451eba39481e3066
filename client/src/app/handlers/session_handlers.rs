//! Session Lifecycle Handlers
//!
//! Reconnect tears the whole worker down and starts over with a fresh
//! `Room`; leave keeps the worker's teardown path in charge.

use crate::app::state::{App, spawn_session};
use crate::events::SessionCommand;
use crate::models::{BackgroundSelection, ConnectionPhase};

impl App {
    /// Tears the current worker down and starts a fresh session. This is
    /// also the recovery path after a failed connect.
    pub(in crate::app) fn handle_reconnect(&mut self) {
        self.logger.info("[SESSION] Reconnect requested");

        // The identity frees up only once the old worker has left the
        // room, so the join has to happen before the new connect.
        self.session.shutdown();
        self.session.join();

        self.connection = ConnectionPhase::Connecting;
        self.encryption_enabled = None;
        self.participants.clear();
        self.camera_enabled = true;
        self.mic_muted = false;
        self.room_state.local_texture = None;
        self.selected_background = BackgroundSelection::none();
        self.settings_open = false;

        let (session, session_evt_rx) = spawn_session(&self.backend, &self.config, &self.logger);
        self.session = session;
        self.session_evt_rx = session_evt_rx;
    }

    /// Leaves the room; the worker confirms with a Disconnected event.
    pub(in crate::app) fn handle_leave_room(&mut self) {
        self.logger.info("[SESSION] Leave requested");
        self.session.send(SessionCommand::Disconnect);
    }
}
