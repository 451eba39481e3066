//! Reusable UI Components

mod button;

pub use button::{Button, ButtonVariant};
