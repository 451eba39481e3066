use egui::{Color32, ColorImage, Vec2};
use roomkit::VideoFrame;

/// Converts an RGBA video frame into an egui texture image.
pub fn frame_to_color_image(frame: &VideoFrame) -> ColorImage {
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    let pixels = frame
        .data()
        .chunks_exact(4)
        .map(|px| Color32::from_rgba_unmultiplied(px[0], px[1], px[2], px[3]))
        .collect();

    ColorImage {
        size: [width, height],
        pixels,
        source_size: Vec2::new(width as f32, height as f32),
    }
}
