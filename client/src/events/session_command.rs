use crate::models::BackgroundSelection;

/// Commands sent from the UI thread to the session worker.
#[derive(Debug)]
pub enum SessionCommand {
    // --- Background effects ---
    /// Swap the camera's background effect.
    ApplyBackground(BackgroundSelection),
    /// Ask the worker which effect the camera is actually running.
    QueryBackground,

    // --- Local media ---
    SetCameraEnabled(bool),
    SetMicrophoneMuted(bool),

    // --- Lifecycle ---
    /// Leave the room and stop the worker.
    Disconnect,
}
