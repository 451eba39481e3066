//! Pluggable transforms for outgoing video.

use crate::error::Result;
use crate::frame::VideoFrame;

/// A named effect applied to every frame of a local video track.
///
/// At most one processor is installed on a track at a time; installing a
/// new one replaces the old. The name is stable and is how callers
/// recognize which effect is active (e.g. `background-blur`).
pub trait TrackProcessor: Send {
    /// Stable effect name.
    fn name(&self) -> &'static str;

    /// Transforms one frame in place.
    ///
    /// # Errors
    ///
    /// On error the track forwards the frame untransformed and keeps the
    /// processor installed.
    fn process(&mut self, frame: &mut VideoFrame) -> Result<()>;
}
