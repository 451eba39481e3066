//! Track Effects Module
//!
//! Background treatments for the outgoing camera track: a background
//! blur and a picture-replacement virtual background, both implementing
//! [`roomkit::TrackProcessor`] over raw RGBA frames.
//!
//! Person segmentation is not part of this crate; both effects accept a
//! [`MaskSource`] so an external model can drive per-pixel coverage. With
//! no mask attached they treat the whole frame as background.

pub mod blur;
pub mod error;
pub mod mask;
pub mod virtual_bg;

// Re-export commonly used types
pub use error::{ProcessorError, Result};

// Effects
pub use blur::{BACKGROUND_BLUR, BackgroundBlur, DEFAULT_BLUR_RADIUS};
pub use virtual_bg::{VIRTUAL_BACKGROUND, VirtualBackground};

// Segmentation seam
pub use mask::{MaskSource, UniformMask};
