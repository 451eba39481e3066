//! Segmentation mask seam.
//!
//! Both background effects decide per pixel how strongly to apply
//! themselves based on a foreground coverage mask. The mask normally
//! comes from an external person-segmentation model; that model stays
//! outside this crate, plugged in through [`MaskSource`].

/// Supplies per-pixel foreground coverage for each frame.
///
/// Coverage is row-major, one byte per pixel: `0` means background
/// (effect applies fully), `255` means person (pixel is kept as captured),
/// values in between blend.
pub trait MaskSource: Send {
    /// Coverage buffer for a frame of the given dimensions. Must contain
    /// exactly `width * height` bytes.
    fn coverage(&mut self, width: u32, height: u32) -> Vec<u8>;
}

/// Constant coverage over the whole frame.
///
/// `UniformMask::all_background()` is the default for both effects: with
/// no segmentation model attached, the effect covers every pixel.
pub struct UniformMask(pub u8);

impl UniformMask {
    pub fn all_background() -> Self {
        UniformMask(0)
    }
}

impl MaskSource for UniformMask {
    fn coverage(&mut self, width: u32, height: u32) -> Vec<u8> {
        vec![self.0; (width * height) as usize]
    }
}

/// Blends effect pixels into the frame according to coverage: full
/// coverage keeps the captured pixel, zero coverage takes the effect
/// pixel, intermediate values mix linearly (rounded).
///
/// All three buffers must describe the same frame; `frame` and `effect`
/// are RGBA, `coverage` one byte per pixel.
pub(crate) fn blend_by_coverage(frame: &mut [u8], effect: &[u8], coverage: &[u8]) {
    for (index, &cov) in coverage.iter().enumerate() {
        if cov == u8::MAX {
            continue;
        }
        let base = index * 4;
        if cov == 0 {
            frame[base..base + 4].copy_from_slice(&effect[base..base + 4]);
            continue;
        }
        let cov = cov as u32;
        for channel in 0..4 {
            let captured = frame[base + channel] as u32;
            let replacement = effect[base + channel] as u32;
            frame[base + channel] =
                ((captured * cov + replacement * (255 - cov) + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_mask_size_and_value() {
        let mut mask = UniformMask(42);
        let coverage = mask.coverage(8, 3);
        assert_eq!(coverage.len(), 24);
        assert!(coverage.iter().all(|&c| c == 42));
    }

    #[test]
    fn test_all_background_is_zero() {
        let mut mask = UniformMask::all_background();
        assert!(mask.coverage(2, 2).iter().all(|&c| c == 0));
    }

    #[test]
    fn test_blend_extremes_are_exact() {
        let mut frame = vec![10, 20, 30, 255, 10, 20, 30, 255];
        let effect = vec![200, 210, 220, 255, 200, 210, 220, 255];
        let coverage = vec![255, 0];

        blend_by_coverage(&mut frame, &effect, &coverage);

        assert_eq!(&frame[0..4], &[10, 20, 30, 255], "person pixel kept");
        assert_eq!(&frame[4..8], &[200, 210, 220, 255], "background replaced");
    }

    #[test]
    fn test_blend_midpoint_mixes() {
        let mut frame = vec![0, 0, 0, 255];
        let effect = vec![255, 255, 255, 255];
        let coverage = vec![128];

        blend_by_coverage(&mut frame, &effect, &coverage);

        // (0 * 128 + 255 * 127 + 127) / 255 = 127
        assert_eq!(&frame[0..4], &[127, 127, 127, 255]);
    }
}
