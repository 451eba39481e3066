//! Raw video frames and the sources that produce them.

use crate::error::{Result, RoomError};
use std::time::Instant;

/// One uncompressed RGBA frame.
///
/// Pixels are stored row-major, four bytes per pixel, no padding between
/// rows. The timestamp marks when the frame was produced, not rendered.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    timestamp: Instant,
}

impl VideoFrame {
    /// Wraps an RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidFrame`] when the buffer length does not
    /// match `width * height * 4`.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RoomError::InvalidFrame(format!(
                "buffer holds {} bytes, {}x{} RGBA needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA value at `(x, y)`. Panics on out-of-bounds coordinates, which
    /// is fine for the test-and-diagnostics use it exists for.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Consumes the frame, returning the pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Produces frames for a local video track. Implemented by device capture
/// in a real engine; the bundled backend provides a synthetic source.
pub trait VideoSource: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Produces the next frame. The capture loop paces calls, so
    /// implementations should return promptly.
    fn next_frame(&mut self) -> Result<VideoFrame>;
}

/// Animated gradient source used by the local backend and the tests.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u64,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl Default for TestPatternSource {
    /// Matches the low simulcast preset (384x216).
    fn default() -> Self {
        Self::new(384, 216)
    }
}

impl VideoSource for TestPatternSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(((x as u64 + self.tick) % 256) as u8);
                data.push(((y as u64 + self.tick / 2) % 256) as u8);
                data.push(128);
                data.push(255);
            }
        }
        self.tick = self.tick.wrapping_add(1);
        VideoFrame::new(data, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_mismatched_buffer() {
        let result = VideoFrame::new(vec![0; 10], 2, 2);
        assert!(matches!(result, Err(RoomError::InvalidFrame(_))));
    }

    #[test]
    fn test_frame_accessors() {
        let frame = VideoFrame::new(vec![7; 2 * 3 * 4], 2, 3).unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.data().len(), 24);
        assert_eq!(frame.pixel(1, 2), [7, 7, 7, 7]);
    }

    #[test]
    fn test_pattern_source_produces_valid_frames() {
        let mut source = TestPatternSource::new(16, 9);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.width(), 16);
        assert_eq!(frame.height(), 9);
        assert_eq!(frame.data().len(), 16 * 9 * 4);
    }

    #[test]
    fn test_pattern_source_animates() {
        let mut source = TestPatternSource::new(8, 8);
        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();
        assert_ne!(first.data(), second.data());
    }

    #[test]
    fn test_default_pattern_matches_low_preset() {
        let source = TestPatternSource::default();
        assert_eq!((source.width(), source.height()), (384, 216));
    }
}
