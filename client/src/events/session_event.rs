use egui::ColorImage;
use roomkit::TrackKind;

use crate::models::BackgroundSelection;

/// Events sent from the session worker back to the UI thread.
///
/// Not `Debug`: `LocalFrame` carries a full decoded frame.
pub enum SessionEvent {
    // --- Bootstrap ---
    /// Encryption was configured (or skipped) before connecting.
    EncryptionReady { enabled: bool },
    /// The room connection is fully set up and media is publishing.
    Connected { room_name: String },
    /// One of the bootstrap steps failed; the worker has stopped.
    ConnectFailed { step: &'static str, error: String },

    // --- Roster ---
    ParticipantJoined { identity: String, name: String },
    ParticipantLeft { identity: String },
    TrackPublished { participant: String, kind: TrackKind },

    // --- Local media ---
    /// A processed preview frame from the local camera.
    LocalFrame(ColorImage),
    CameraState { enabled: bool },
    MicrophoneState { muted: bool },

    // --- Background effects ---
    /// The requested effect is now running on the camera track.
    BackgroundApplied(BackgroundSelection),
    /// Answer to `SessionCommand::QueryBackground`.
    CurrentBackground(BackgroundSelection),

    // --- Lifecycle ---
    /// The session ended, either on request or server side.
    Disconnected,
}
