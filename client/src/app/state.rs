//! Application State
//!
//! This module defines the main application state and initialization logic.
//! It implements the MVU (Model-View-Update) pattern's Controller component.
//!
//! # Architecture
//!
//! The `App` struct contains:
//! - **Connection**: which phase the session is in, encryption status
//! - **Roster**: the remote participants the worker has announced
//! - **Media**: camera/microphone flags and the preview texture
//! - **Communication**: the session worker handle and its event channel
//!
//! # MVU Loop
//!
//! The `eframe::App::update()` implementation follows this flow:
//! 1. Process events from the session worker (non-blocking)
//! 2. Render the room view (pure function)
//! 3. Handle UI commands from the view (state mutations)
//!
//! This ensures unidirectional data flow and predictable state management.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};

use logging::Logger;
use roomkit::{LocalRoomService, RoomBackend, TrackKind, TrackSource};

use crate::config::AppConfig;
use crate::events::{SessionEvent, UiCommand};
use crate::models::{
    BackgroundImage, BackgroundSelection, ConnectionPhase, ParticipantEntry, discover_backgrounds,
};
use crate::pages::room::components::{SettingsMenuParams, render_settings_menu};
use crate::pages::room::{RoomPage, RoomState, RoomViewParams};
use crate::session::{SessionConfig, SessionWorker};

/// Main application state - MVU Controller
pub struct App {
    // Config
    pub(super) config: AppConfig,

    // Logger
    pub(super) logger: Logger,

    // Room service the session worker connects through
    pub(super) backend: Arc<LocalRoomService>,

    // Session Worker Communication
    pub(super) session: SessionWorker,
    pub(super) session_evt_rx: Receiver<SessionEvent>,

    // Connection State
    pub(super) connection: ConnectionPhase,
    pub(super) encryption_enabled: Option<bool>,

    // Roster
    pub(super) participants: Vec<ParticipantEntry>,

    // Local Media State
    pub(super) camera_enabled: bool,
    pub(super) mic_muted: bool,

    // Room Page State (video textures)
    pub(super) room_state: RoomState,

    // Settings Menu State
    pub(super) settings_open: bool,
    pub(super) selected_background: BackgroundSelection,
    pub(super) background_images: Vec<BackgroundImage>,
}

impl App {
    /// Create a new App instance with configuration and logger
    pub fn new() -> Self {
        // Load application configuration
        let config = AppConfig::load();

        // Initialize logger from configuration
        let logger = match Logger::with_component(
            config.log_path.clone(),
            config.log_level,
            "Client".to_string(),
            false,
        ) {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Failed to initialize logger: {}", e);
                std::process::exit(1);
            }
        };

        logger.info("[APP] Initializing application...");
        logger.info(&format!(
            "[APP] Configuration loaded - server: {}, log_level: {:?}",
            config.server_url, config.log_level
        ));

        let backend = Arc::new(LocalRoomService::with_logger(logger.clone()));
        seed_room_agent(&backend, &config, &logger);

        let background_images = discover_backgrounds(&config.background_dir);
        logger.info(&format!(
            "[BACKGROUND] Found {} background image(s) in {}",
            background_images.len(),
            config.background_dir.display()
        ));

        logger.info("[APP] Starting session worker...");
        let (session, session_evt_rx) = spawn_session(&backend, &config, &logger);

        let app = Self {
            config,
            logger: logger.clone(),
            backend,
            session,
            session_evt_rx,
            connection: ConnectionPhase::Connecting,
            encryption_enabled: None,
            participants: Vec::new(),
            camera_enabled: true,
            mic_muted: false,
            room_state: RoomState::new(),
            settings_open: false,
            selected_background: BackgroundSelection::none(),
            background_images,
        };

        logger.info("[APP] Application initialized successfully");
        app
    }
}

/// Starts a session worker with a fresh event channel. A stale channel
/// from an earlier worker simply stops being read.
pub(super) fn spawn_session(
    backend: &Arc<LocalRoomService>,
    config: &AppConfig,
    logger: &Logger,
) -> (SessionWorker, Receiver<SessionEvent>) {
    let session_config = SessionConfig {
        server_url: config.server_url.clone(),
        token: config.token.clone(),
        video_codec: config.video_codec,
        agent_identity: config.agent_identity.clone(),
        e2ee_passphrase: config.e2ee_passphrase.clone(),
        staging_mode: config.staging_mode,
    };

    let (event_tx, event_rx) = channel();
    let backend: Arc<dyn RoomBackend> = backend.clone();
    let worker = SessionWorker::spawn(backend, session_config, event_tx, logger.clone());
    (worker, event_rx)
}

/// Puts the scripted room agent into the demo room, so the subscription
/// policy has a counterpart to act on.
fn seed_room_agent(backend: &LocalRoomService, config: &AppConfig, logger: &Logger) {
    let Some(room_name) = config.server_url.strip_prefix("local://") else {
        return;
    };

    let result = backend.add_scripted_participant(
        room_name,
        config.agent_identity.as_str(),
        &config.agent_identity,
        &[(TrackKind::Audio, TrackSource::Microphone)],
    );
    match result {
        Ok(_) => logger.info(&format!(
            "[APP] Room agent '{}' seeded into {}",
            config.agent_identity, room_name
        )),
        Err(e) => logger.warn(&format!("[APP] Could not seed room agent: {}", e)),
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- MVU UPDATE LOOP ---

        // 1. Process all pending session events (from the worker thread)
        while let Ok(event) = self.session_evt_rx.try_recv() {
            self.handle_session_event(ctx, event);
        }

        // 2. Keep the preview fresh while frames stream in
        ctx.request_repaint_after(std::time::Duration::from_millis(100));

        // 3. Render the view and collect UI commands
        let mut ui_command = self.render_view(ctx);

        // 4. Keyboard shortcuts mirror the on-screen controls
        ui_command = ui_command.or(self.keyboard_command(ctx));

        // 5. Process UI command (if any)
        if let Some(command) = ui_command {
            self.handle_ui_command(command);
        }
    }

    /// Called when the app is about to close
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.logger.info("[APP] Application shutting down...");
        self.session.shutdown();
        self.session.join();
        self.logger.info("[APP] Cleanup complete, goodbye!");
    }
}

impl App {
    /// Renders the room view and returns any UI command
    fn render_view(&mut self, ctx: &egui::Context) -> Option<UiCommand> {
        let mut ui_command = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let params = RoomViewParams {
                connection: &self.connection,
                local_texture: self.room_state.local_texture.as_ref(),
                participants: &self.participants,
                camera_enabled: self.camera_enabled,
                mic_muted: self.mic_muted,
                settings_enabled: self.config.show_settings_menu,
            };
            ui_command = RoomPage::show(ui, params);
        });

        // The settings menu floats over the room as a separate window
        if self.settings_open {
            ui_command = self.render_settings_window(ctx).or(ui_command);
        }

        ui_command
    }

    fn render_settings_window(&mut self, ctx: &egui::Context) -> Option<UiCommand> {
        let params = SettingsMenuParams {
            selected: &self.selected_background,
            images: &self.background_images,
            camera_enabled: self.camera_enabled,
            mic_muted: self.mic_muted,
            connection: &self.connection,
            encryption_enabled: self.encryption_enabled,
            video_codec: self.config.video_codec,
            participant_count: self.participants.len(),
        };
        render_settings_menu(ctx, params)
    }

    /// M and C toggle the microphone and camera from the keyboard.
    fn keyboard_command(&self, ctx: &egui::Context) -> Option<UiCommand> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::M)) {
            return Some(UiCommand::ToggleMicrophone);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::C)) {
            return Some(UiCommand::ToggleCamera);
        }
        None
    }
}
