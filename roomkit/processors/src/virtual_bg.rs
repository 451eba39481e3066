//! Virtual background effect.
//!
//! Replaces the background with a picture loaded from disk. The picture
//! is decoded once at construction and rescaled lazily to each frame
//! size it meets; the scaled copy is cached until the frame size changes.

use crate::error::{ProcessorError, Result};
use crate::mask::{MaskSource, UniformMask, blend_by_coverage};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use roomkit::{RoomError, TrackProcessor, VideoFrame};
use std::path::Path;

/// Stable effect name reported through [`TrackProcessor::name`].
pub const VIRTUAL_BACKGROUND: &str = "virtual-background";

/// Replaces everything the mask marks as background with a picture.
pub struct VirtualBackground {
    source: RgbaImage,
    scaled: Option<Scaled>,
    mask: Box<dyn MaskSource>,
}

/// Background rescaled to one frame size.
struct Scaled {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl VirtualBackground {
    /// Loads the background picture, replacing the whole frame (no
    /// segmentation model attached).
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or decoded.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_mask(path, Box::new(UniformMask::all_background()))
    }

    /// Loads the background picture, compositing through an external
    /// segmentation mask.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or decoded.
    pub fn with_mask(path: impl AsRef<Path>, mask: Box<dyn MaskSource>) -> Result<Self> {
        let path = path.as_ref();
        let source = image::open(path)
            .map_err(|e| ProcessorError::Image(format!("{}: {}", path.display(), e)))?
            .into_rgba8();
        Ok(Self {
            source,
            scaled: None,
            mask,
        })
    }

    /// Dimensions of the loaded picture before any rescaling.
    pub fn image_size(&self) -> (u32, u32) {
        self.source.dimensions()
    }
}

impl TrackProcessor for VirtualBackground {
    fn name(&self) -> &'static str {
        VIRTUAL_BACKGROUND
    }

    fn process(&mut self, frame: &mut VideoFrame) -> roomkit::Result<()> {
        let width = frame.width();
        let height = frame.height();

        let coverage = self.mask.coverage(width, height);
        if coverage.len() != (width * height) as usize {
            return Err(RoomError::Processor(format!(
                "mask produced {} coverage bytes for a {}x{} frame",
                coverage.len(),
                width,
                height
            )));
        }

        let needs_rescale = match &self.scaled {
            Some(scaled) => scaled.width != width || scaled.height != height,
            None => true,
        };
        if needs_rescale {
            let pixels =
                imageops::resize(&self.source, width, height, FilterType::Triangle).into_raw();
            self.scaled = Some(Scaled {
                width,
                height,
                pixels,
            });
        }

        if let Some(scaled) = &self.scaled {
            blend_by_coverage(frame.data_mut(), &scaled.pixels, &coverage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_solid_png(dir: &Path, name: &str, rgba: [u8; 4], width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba(rgba))
            .save(&path)
            .unwrap();
        path
    }

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
    fn test_missing_file_is_an_error() {
        let result = VirtualBackground::new("/no/such/background.png");
        assert!(matches!(result, Err(ProcessorError::Image(_))));
    }

    #[test]
    fn test_name_is_stable() {
        let dir = tempdir().unwrap();
        let path = write_solid_png(dir.path(), "beach.png", [1, 2, 3, 255], 2, 2);
        let processor = VirtualBackground::new(&path).unwrap();
        assert_eq!(processor.name(), "virtual-background");
        assert_eq!(VIRTUAL_BACKGROUND, "virtual-background");
        assert_eq!(processor.image_size(), (2, 2));
    }

    #[test]
    fn test_background_replaces_whole_frame_by_default() {
        let dir = tempdir().unwrap();
        let path = write_solid_png(dir.path(), "beach.png", [10, 180, 90, 255], 8, 8);
        let mut processor = VirtualBackground::new(&path).unwrap();

        let mut frame = solid_frame(16, 10, [200, 0, 0, 255]);
        processor.process(&mut frame).unwrap();

        assert!(
            frame
                .data()
                .chunks_exact(4)
                .all(|pixel| pixel == [10, 180, 90, 255]),
            "every pixel should show the background picture"
        );
    }

    #[test]
    fn test_person_pixels_survive_composite() {
        struct CornerMask;
        impl MaskSource for CornerMask {
            fn coverage(&mut self, width: u32, height: u32) -> Vec<u8> {
                let mut coverage = vec![0; (width * height) as usize];
                coverage[0] = 255; // pixel (0, 0)
                coverage
            }
        }

        let dir = tempdir().unwrap();
        let path = write_solid_png(dir.path(), "sky.png", [0, 0, 255, 255], 4, 4);
        let mut processor = VirtualBackground::with_mask(&path, Box::new(CornerMask)).unwrap();

        let mut frame = solid_frame(4, 4, [255, 0, 0, 255]);
        processor.process(&mut frame).unwrap();

        assert_eq!(frame.pixel(0, 0), [255, 0, 0, 255], "person pixel kept");
        assert_eq!(frame.pixel(1, 0), [0, 0, 255, 255], "background replaced");
    }

    #[test]
    fn test_rescale_follows_frame_size() {
        let dir = tempdir().unwrap();
        let path = write_solid_png(dir.path(), "forest.png", [30, 120, 60, 255], 8, 8);
        let mut processor = VirtualBackground::new(&path).unwrap();

        for (width, height) in [(6, 4), (6, 4), (12, 8)] {
            let mut frame = solid_frame(width, height, [9, 9, 9, 255]);
            processor.process(&mut frame).unwrap();
            assert!(
                frame
                    .data()
                    .chunks_exact(4)
                    .all(|pixel| pixel == [30, 120, 60, 255]),
                "{}x{} frame should be fully replaced",
                width,
                height
            );
        }
    }

    #[test]
    fn test_wrong_sized_mask_is_an_error() {
        struct ShortMask;
        impl MaskSource for ShortMask {
            fn coverage(&mut self, _width: u32, _height: u32) -> Vec<u8> {
                vec![0; 1]
            }
        }

        let dir = tempdir().unwrap();
        let path = write_solid_png(dir.path(), "sky.png", [0, 0, 255, 255], 2, 2);
        let mut processor = VirtualBackground::with_mask(&path, Box::new(ShortMask)).unwrap();
        let mut frame = solid_frame(4, 4, [1, 1, 1, 255]);
        assert!(processor.process(&mut frame).is_err());
    }
}
