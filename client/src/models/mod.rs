mod background;
mod connection;
mod participant;

pub use background::{BackgroundImage, BackgroundSelection, BackgroundType, discover_backgrounds};
pub use connection::ConnectionPhase;
pub use participant::ParticipantEntry;
