//! Session Worker Thread
//!
//! Owns the `Room` for the whole session; the UI never touches the SDK
//! directly. Bootstrap walks a fixed sequence of steps with a
//! cancellation checkpoint after each one, so a shutdown arriving
//! mid-connect never leaves a half-configured session behind. After
//! bootstrap the thread serves commands until disconnect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use logging::Logger;
use roomkit::{
    AdaptiveStreamOptions, ConnectOptions, E2eeOptions, ExternalKeyProvider, HandlerId,
    LocalParticipant, LocalVideoTrack, PublishDefaults, Room, RoomBackend, RoomError, RoomEvent,
    RoomOptions, VideoCodec, presets,
};
use track_processors::{BackgroundBlur, VirtualBackground};

use crate::events::{SessionCommand, SessionEvent};
use crate::models::{BackgroundSelection, BackgroundType};
use crate::session::policy;
use crate::session::utils::frame_to_color_image;

/// Connection parameters for one session, taken from `AppConfig`.
#[derive(Clone)]
pub struct SessionConfig {
    pub server_url: String,
    pub token: String,
    pub video_codec: VideoCodec,
    pub agent_identity: String,
    pub e2ee_passphrase: Option<String>,
    pub staging_mode: bool,
}

/// Handle held by the UI thread.
pub struct SessionWorker {
    command_tx: Sender<SessionCommand>,
    cancel: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl SessionWorker {
    /// Spawns the worker thread. It starts connecting immediately and
    /// reports progress through `event_tx`.
    pub fn spawn(
        backend: Arc<dyn RoomBackend>,
        config: SessionConfig,
        event_tx: Sender<SessionEvent>,
        logger: Logger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker_cancel = Arc::clone(&cancel);
        let thread = thread::spawn(move || {
            run_session_worker(backend, config, command_rx, event_tx, worker_cancel, logger);
        });

        Self {
            command_tx,
            cancel,
            thread: Some(thread),
        }
    }

    /// Queues a command. Quietly dropped when the worker already stopped.
    pub fn send(&self, command: SessionCommand) {
        let _ = self.command_tx.send(command);
    }

    /// Stops the worker. A bootstrap in flight aborts at its next
    /// checkpoint; a live session disconnects.
    pub fn shutdown(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        let _ = self.command_tx.send(SessionCommand::Disconnect);
    }

    /// Waits for the worker thread to finish. Call after `shutdown`;
    /// the identity only frees up once the old session has left the
    /// room, and a fresh session must not connect before that.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// A fully bootstrapped session.
struct ActiveSession {
    room: Room,
    handler_id: HandlerId,
    /// Last selection successfully applied to the camera track.
    applied_background: BackgroundSelection,
}

fn run_session_worker(
    backend: Arc<dyn RoomBackend>,
    config: SessionConfig,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
    cancel: Arc<AtomicBool>,
    logger: Logger,
) {
    let Some(mut session) = bootstrap(backend, &config, &event_tx, &cancel, &logger) else {
        logger.info("[SESSION] Session worker stopped");
        return;
    };

    for command in command_rx {
        if cancel.load(Ordering::SeqCst) {
            break;
        }
        match command {
            SessionCommand::ApplyBackground(selection) => {
                apply_background(&mut session, selection, &event_tx, &logger);
            }
            SessionCommand::QueryBackground => report_background(&session, &event_tx, &logger),
            SessionCommand::SetCameraEnabled(enabled) => {
                set_camera_enabled(&session, enabled, &event_tx, &logger);
            }
            SessionCommand::SetMicrophoneMuted(muted) => {
                set_microphone_muted(&session, muted, &event_tx, &logger);
            }
            SessionCommand::Disconnect => break,
        }
    }

    // Handler comes off before disconnect so the room's own disconnect
    // event does not double up with the one sent here.
    session.room.off(session.handler_id);
    session.room.disconnect();
    let _ = event_tx.send(SessionEvent::Disconnected);
    logger.info("[SESSION] Session worker stopped");
}

/// Runs the bootstrap sequence. Returns `None` when a step failed or the
/// worker was cancelled; a partially connected room is torn down before
/// returning. No retry: the session stays down until the user reconnects.
fn bootstrap(
    backend: Arc<dyn RoomBackend>,
    config: &SessionConfig,
    event_tx: &Sender<SessionEvent>,
    cancel: &AtomicBool,
    logger: &Logger,
) -> Option<ActiveSession> {
    // 1. Room options from configuration
    let room = Room::new(backend, build_room_options(config));

    // 2. Encryption gate: key material and the E2EE switch both settle
    //    before any connection attempt
    if let Some(passphrase) = &config.e2ee_passphrase {
        if let Err(e) = enable_encryption(&room, passphrase) {
            report_failure("encryption setup", &e, event_tx, logger);
            return None;
        }
        logger.info("[E2EE] Key installed, encryption enabled");
    }
    let _ = event_tx.send(SessionEvent::EncryptionReady {
        enabled: room.e2ee_enabled(),
    });
    if cancelled(cancel, logger, "encryption setup") {
        return None;
    }

    // 3. The event handler goes in before connect; a publication cannot
    //    slip between the two
    let handler_id = register_event_handler(&room, event_tx.clone(), logger.clone());
    if cancelled(cancel, logger, "handler registration") {
        room.off(handler_id);
        return None;
    }

    // 4. Connect with subscriptions under manual control
    let connect_options = ConnectOptions {
        auto_subscribe: false,
    };
    if let Err(e) = room.connect(&config.server_url, &config.token, connect_options) {
        room.off(handler_id);
        report_failure("connect", &e, event_tx, logger);
        return None;
    }
    logger.info(&format!(
        "[SESSION] Connected to {}",
        room.name().unwrap_or_default()
    ));
    if cancelled(cancel, logger, "connect") {
        abort_session(&room, handler_id);
        return None;
    }

    // 5. Lock down who may subscribe to our tracks
    let Some(local) = room.local_participant() else {
        abort_session(&room, handler_id);
        report_failure("connect", &RoomError::NotConnected, event_tx, logger);
        return None;
    };
    let permissions = policy::subscription_permissions(&config.agent_identity);
    if let Err(e) = local.set_subscription_permissions(permissions) {
        abort_session(&room, handler_id);
        report_failure("subscription permissions", &e, event_tx, logger);
        return None;
    }
    if cancelled(cancel, logger, "subscription permissions") {
        abort_session(&room, handler_id);
        return None;
    }

    // 6. Publish local media and start the preview pump
    if let Err(e) = local.enable_camera_and_microphone() {
        abort_session(&room, handler_id);
        report_failure("media publish", &e, event_tx, logger);
        return None;
    }
    start_preview_pump(&local, event_tx.clone(), logger);
    if cancelled(cancel, logger, "media publish") {
        abort_session(&room, handler_id);
        return None;
    }

    // 7. The policy runs once over everything already in the room
    sweep_existing_publications(&room, event_tx, logger);

    let _ = event_tx.send(SessionEvent::Connected {
        room_name: room.name().unwrap_or_default(),
    });

    Some(ActiveSession {
        room,
        handler_id,
        applied_background: BackgroundSelection::none(),
    })
}

/// Room options for one session: simulcast at 540p and 216p, RED off
/// whenever E2EE is on, adaptive streaming at screen density, single
/// peer connection for staging deployments.
fn build_room_options(config: &SessionConfig) -> RoomOptions {
    let e2ee = config
        .e2ee_passphrase
        .as_ref()
        .map(|_| E2eeOptions::new(Arc::new(ExternalKeyProvider::new())));

    RoomOptions {
        publish_defaults: PublishDefaults {
            simulcast_layers: vec![presets::H540, presets::H216],
            red: e2ee.is_none(),
            video_codec: config.video_codec,
        },
        adaptive_stream: Some(AdaptiveStreamOptions::default()),
        dynacast: true,
        e2ee,
        single_peer_connection: config.staging_mode,
    }
}

/// Installs the passphrase-derived key, then flips the room to
/// encrypted. Ordering matters: the key must be in place first.
fn enable_encryption(room: &Room, passphrase: &str) -> roomkit::Result<()> {
    let provider = room
        .options()
        .e2ee
        .as_ref()
        .map(|options| Arc::clone(&options.key_provider))
        .ok_or_else(|| RoomError::Encryption("no E2EE options configured".to_string()))?;
    provider.set_key(passphrase)?;
    room.set_e2ee_enabled(true)
}

/// Forwards room events to the UI and applies the subscription policy
/// to tracks published while we are connected.
fn register_event_handler(
    room: &Room,
    event_tx: Sender<SessionEvent>,
    logger: Logger,
) -> HandlerId {
    let weak = room.downgrade();
    room.on(move |event| match event {
        RoomEvent::TrackPublished {
            participant,
            publication,
        } => {
            if let Some(room) = weak.upgrade() {
                policy::apply_publication_policy(&room, participant, publication, &logger);
            }
            let _ = event_tx.send(SessionEvent::TrackPublished {
                participant: participant.as_str().to_string(),
                kind: publication.kind,
            });
        }
        RoomEvent::ParticipantConnected { participant } => {
            let _ = event_tx.send(SessionEvent::ParticipantJoined {
                identity: participant.identity.as_str().to_string(),
                name: participant.name.clone(),
            });
        }
        RoomEvent::ParticipantDisconnected { identity } => {
            let _ = event_tx.send(SessionEvent::ParticipantLeft {
                identity: identity.as_str().to_string(),
            });
        }
        RoomEvent::Disconnected => {
            let _ = event_tx.send(SessionEvent::Disconnected);
        }
        RoomEvent::TrackUnpublished { .. } => {}
    })
}

/// One pass over the connect snapshot: the UI learns about participants
/// already in the room, and every known publication goes through the
/// subscription policy.
fn sweep_existing_publications(room: &Room, event_tx: &Sender<SessionEvent>, logger: &Logger) {
    for participant in room.remote_participants() {
        let _ = event_tx.send(SessionEvent::ParticipantJoined {
            identity: participant.identity.as_str().to_string(),
            name: participant.name.clone(),
        });
        for publication in &participant.publications {
            policy::apply_publication_policy(room, &participant.identity, publication, logger);
        }
    }
}

/// Pumps processed camera frames to the UI. The thread ends on its own
/// when the track stops and drops the frame sender.
fn start_preview_pump(local: &LocalParticipant, event_tx: Sender<SessionEvent>, logger: &Logger) {
    let Some(track) = local.camera_track() else {
        logger.warn("[SESSION] Camera track missing, preview disabled");
        return;
    };
    let frames = track.subscribe_frames();
    thread::spawn(move || {
        for frame in frames {
            let image = frame_to_color_image(&frame);
            if event_tx.send(SessionEvent::LocalFrame(image)).is_err() {
                break;
            }
        }
    });
}

/// Tears down a room that got through connect but not through the full
/// bootstrap. The handler comes off first so the teardown stays silent.
fn abort_session(room: &Room, handler_id: HandlerId) {
    room.off(handler_id);
    room.disconnect();
}

/// Checkpoint between bootstrap steps.
fn cancelled(cancel: &AtomicBool, logger: &Logger, stage: &str) -> bool {
    if cancel.load(Ordering::SeqCst) {
        logger.info(&format!("[SESSION] Bootstrap cancelled after {}", stage));
        return true;
    }
    false
}

fn report_failure(
    step: &'static str,
    error: &RoomError,
    event_tx: &Sender<SessionEvent>,
    logger: &Logger,
) {
    logger.error(&format!("[SESSION] {} failed: {}", step, error));
    let _ = event_tx.send(SessionEvent::ConnectFailed {
        step,
        error: error.to_string(),
    });
}

/// Swaps the effect on the camera track. Reapplying the active selection
/// is a no-op; a selection that fails to build leaves the running effect
/// untouched.
fn apply_background(
    session: &mut ActiveSession,
    selection: BackgroundSelection,
    event_tx: &Sender<SessionEvent>,
    logger: &Logger,
) {
    if selection == session.applied_background {
        logger.debug(&format!(
            "[BACKGROUND] {} already active, nothing to do",
            selection.label()
        ));
        return;
    }

    let Some(track) = camera_track(session, logger) else {
        return;
    };

    let result = match (selection.background, selection.image_path.as_deref()) {
        (BackgroundType::None, _) => track.stop_processor(),
        (BackgroundType::Blur, _) => track.set_processor(Box::new(BackgroundBlur::new())),
        (BackgroundType::Image, Some(path)) => match VirtualBackground::new(path) {
            Ok(processor) => track.set_processor(Box::new(processor)),
            Err(e) => {
                logger.error(&format!("[BACKGROUND] Failed to load {}: {}", path.display(), e));
                return;
            }
        },
        (BackgroundType::Image, None) => {
            logger.warn("[BACKGROUND] Image selected without a path, keeping current effect");
            return;
        }
    };

    match result {
        Ok(()) => {
            logger.info(&format!("[BACKGROUND] Applied {}", selection.label()));
            session.applied_background = selection.clone();
            let _ = event_tx.send(SessionEvent::BackgroundApplied(selection));
        }
        Err(e) => {
            logger.error(&format!(
                "[BACKGROUND] Failed to apply {}: {}",
                selection.label(),
                e
            ));
        }
    }
}

/// Answers `QueryBackground` with what the track is actually running,
/// not with what the UI believes.
fn report_background(session: &ActiveSession, event_tx: &Sender<SessionEvent>, logger: &Logger) {
    let Some(track) = camera_track(session, logger) else {
        return;
    };
    let current = BackgroundSelection::from_processor(
        track.processor_name(),
        session.applied_background.image_path.clone(),
    );
    let _ = event_tx.send(SessionEvent::CurrentBackground(current));
}

fn set_camera_enabled(
    session: &ActiveSession,
    enabled: bool,
    event_tx: &Sender<SessionEvent>,
    logger: &Logger,
) {
    let Some(track) = camera_track(session, logger) else {
        return;
    };
    track.set_enabled(enabled);
    logger.info(&format!(
        "[SESSION] Camera {}",
        if enabled { "enabled" } else { "disabled" }
    ));
    let _ = event_tx.send(SessionEvent::CameraState { enabled });
}

fn set_microphone_muted(
    session: &ActiveSession,
    muted: bool,
    event_tx: &Sender<SessionEvent>,
    logger: &Logger,
) {
    let track = session
        .room
        .local_participant()
        .and_then(|local| local.microphone_track());
    let Some(track) = track else {
        logger.warn("[SESSION] No microphone track, command ignored");
        return;
    };
    track.set_muted(muted);
    logger.info(&format!(
        "[SESSION] Microphone {}",
        if muted { "muted" } else { "unmuted" }
    ));
    let _ = event_tx.send(SessionEvent::MicrophoneState { muted });
}

fn camera_track(session: &ActiveSession, logger: &Logger) -> Option<Arc<LocalVideoTrack>> {
    let track = session
        .room
        .local_participant()
        .and_then(|local| local.camera_track());
    if track.is_none() {
        logger.warn("[SESSION] No camera track, command ignored");
    }
    track
}
