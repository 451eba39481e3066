//! Background blur effect.
//!
//! Two-pass separable box blur over the frame, blended back through the
//! segmentation mask so the person stays sharp while the surroundings
//! soften.

use crate::mask::{MaskSource, UniformMask, blend_by_coverage};
use roomkit::{RoomError, TrackProcessor, VideoFrame};

/// Stable effect name reported through [`TrackProcessor::name`].
pub const BACKGROUND_BLUR: &str = "background-blur";

/// Blur strength used when the caller does not pick one.
pub const DEFAULT_BLUR_RADIUS: u32 = 10;

/// Blurs everything the mask marks as background.
pub struct BackgroundBlur {
    radius: u32,
    mask: Box<dyn MaskSource>,
    // Scratch buffers reused across frames.
    horizontal: Vec<u8>,
    blurred: Vec<u8>,
}

impl BackgroundBlur {
    /// Default-strength blur covering the whole frame (no segmentation
    /// model attached).
    pub fn new() -> Self {
        Self::with_radius(DEFAULT_BLUR_RADIUS)
    }

    /// Blur with an explicit radius, whole-frame coverage.
    pub fn with_radius(radius: u32) -> Self {
        Self::with_mask(radius, Box::new(UniformMask::all_background()))
    }

    /// Blur driven by an external segmentation mask. A radius of zero is
    /// raised to one so the effect is never a silent no-op.
    pub fn with_mask(radius: u32, mask: Box<dyn MaskSource>) -> Self {
        Self {
            radius: radius.max(1),
            mask,
            horizontal: Vec::new(),
            blurred: Vec::new(),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }
}

impl Default for BackgroundBlur {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackProcessor for BackgroundBlur {
    fn name(&self) -> &'static str {
        BACKGROUND_BLUR
    }

    fn process(&mut self, frame: &mut VideoFrame) -> roomkit::Result<()> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;

        let coverage = self.mask.coverage(frame.width(), frame.height());
        if coverage.len() != width * height {
            return Err(RoomError::Processor(format!(
                "mask produced {} coverage bytes for a {}x{} frame",
                coverage.len(),
                width,
                height
            )));
        }

        let byte_len = width * height * 4;
        self.horizontal.resize(byte_len, 0);
        self.blurred.resize(byte_len, 0);

        let radius = self.radius as usize;
        box_blur_horizontal(frame.data(), &mut self.horizontal, width, height, radius);
        box_blur_vertical(&self.horizontal, &mut self.blurred, width, height, radius);

        blend_by_coverage(frame.data_mut(), &self.blurred, &coverage);
        Ok(())
    }
}

/// Horizontal pass: each output pixel averages the row window
/// `[x - radius, x + radius]`, clamped to the frame.
fn box_blur_horizontal(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    for y in 0..height {
        let row = y * width;
        let mut sum = [0u32; 4];
        let mut count = 0u32;
        // Prime the window covering x = 0.
        for x in 0..width.min(radius + 1) {
            add_pixel(&mut sum, src, row + x);
            count += 1;
        }
        for x in 0..width {
            write_average(dst, row + x, &sum, count);
            let incoming = x + radius + 1;
            if incoming < width {
                add_pixel(&mut sum, src, row + incoming);
                count += 1;
            }
            if x >= radius {
                remove_pixel(&mut sum, src, row + x - radius);
                count -= 1;
            }
        }
    }
}

/// Vertical pass over the horizontally blurred buffer.
fn box_blur_vertical(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    for x in 0..width {
        let mut sum = [0u32; 4];
        let mut count = 0u32;
        for y in 0..height.min(radius + 1) {
            add_pixel(&mut sum, src, y * width + x);
            count += 1;
        }
        for y in 0..height {
            write_average(dst, y * width + x, &sum, count);
            let incoming = y + radius + 1;
            if incoming < height {
                add_pixel(&mut sum, src, incoming * width + x);
                count += 1;
            }
            if y >= radius {
                remove_pixel(&mut sum, src, (y - radius) * width + x);
                count -= 1;
            }
        }
    }
}

fn add_pixel(sum: &mut [u32; 4], pixels: &[u8], index: usize) {
    let base = index * 4;
    for channel in 0..4 {
        sum[channel] += pixels[base + channel] as u32;
    }
}

fn remove_pixel(sum: &mut [u32; 4], pixels: &[u8], index: usize) {
    let base = index * 4;
    for channel in 0..4 {
        sum[channel] -= pixels[base + channel] as u32;
    }
}

fn write_average(pixels: &mut [u8], index: usize, sum: &[u32; 4], count: u32) {
    let base = index * 4;
    for channel in 0..4 {
        pixels[base + channel] = (sum[channel] / count) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> VideoFrame {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        VideoFrame::new(data, width, height).unwrap()
    }

    #[test]
    fn test_name_is_stable() {
        assert_eq!(BackgroundBlur::new().name(), "background-blur");
        assert_eq!(BACKGROUND_BLUR, "background-blur");
    }

    #[test]
    fn test_zero_radius_is_raised() {
        assert_eq!(BackgroundBlur::with_radius(0).radius(), 1);
    }

    #[test]
    fn test_uniform_frame_is_unchanged() {
        let mut processor = BackgroundBlur::with_radius(4);
        let mut frame = solid_frame(16, 9, [120, 60, 30, 255]);
        processor.process(&mut frame).unwrap();
        assert!(
            frame
                .data()
                .chunks_exact(4)
                .all(|pixel| pixel == [120, 60, 30, 255])
        );
    }

    #[test]
    fn test_hard_edge_is_smoothed() {
        // Left half black, right half white.
        let width = 8u32;
        let height = 4u32;
        let mut data = Vec::new();
        for _y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let mut frame = VideoFrame::new(data, width, height).unwrap();
        BackgroundBlur::with_radius(2).process(&mut frame).unwrap();

        let edge = frame.pixel(3, 2);
        assert!(
            edge[0] > 0 && edge[0] < 255,
            "boundary pixel should become mid-gray, got {}",
            edge[0]
        );
        // Pixels whose whole window sits on one side keep their value.
        assert_eq!(frame.pixel(0, 0)[0], 0);
        assert_eq!(frame.pixel(7, 3)[0], 255);
        // Alpha is untouched by the blur.
        assert!(frame.data().chunks_exact(4).all(|pixel| pixel[3] == 255));
    }

    #[test]
    fn test_person_pixels_are_kept_sharp() {
        struct SpotMask;
        impl MaskSource for SpotMask {
            fn coverage(&mut self, width: u32, height: u32) -> Vec<u8> {
                let mut coverage = vec![0; (width * height) as usize];
                coverage[(width + 1) as usize] = 255; // pixel (1, 1)
                coverage
            }
        }

        // Alternating black/white columns, so blurring changes every pixel.
        let width = 4u32;
        let height = 4u32;
        let mut data = Vec::new();
        for _y in 0..height {
            for x in 0..width {
                let v = if x % 2 == 0 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let mut frame = VideoFrame::new(data, width, height).unwrap();
        let mut processor = BackgroundBlur::with_mask(1, Box::new(SpotMask));
        processor.process(&mut frame).unwrap();

        assert_eq!(
            frame.pixel(1, 1),
            [255, 255, 255, 255],
            "masked person pixel must keep its captured value"
        );
        assert_ne!(
            frame.pixel(2, 1),
            [0, 0, 0, 255],
            "background pixels must be blurred"
        );
    }

    #[test]
    fn test_wrong_sized_mask_is_an_error() {
        struct ShortMask;
        impl MaskSource for ShortMask {
            fn coverage(&mut self, _width: u32, _height: u32) -> Vec<u8> {
                vec![0; 3]
            }
        }

        let mut processor = BackgroundBlur::with_mask(1, Box::new(ShortMask));
        let mut frame = solid_frame(4, 4, [1, 2, 3, 255]);
        assert!(processor.process(&mut frame).is_err());
    }
}
