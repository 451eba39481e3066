use crate::models::BackgroundSelection;

/// Commands initiated by the UI (View -> Controller)
/// These are "requests" to perform actions.
#[derive(Debug, Clone)]
pub enum UiCommand {
    // --- Room controls ---
    ToggleCamera,
    ToggleMicrophone,
    /// Tear the session down and start a fresh one.
    Reconnect,
    LeaveRoom,

    // --- Settings menu ---
    OpenSettings,
    CloseSettings,
    SelectBackground(BackgroundSelection),
}
