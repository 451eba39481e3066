mod session_command;
mod session_event;
mod ui_command;

pub use session_command::SessionCommand;
pub use session_event::SessionEvent;
pub use ui_command::UiCommand;
