//! Drawing laid-out lines onto the composite.

use super::layout::{PlacedLine, break_lines, layout_lines};
use super::{Face, TextBlockSpec};
use image::{Rgb, RgbaImage};

/// Blend `color` over the pixel at `(x, y)` with `coverage` as source alpha.
/// Coordinates outside the canvas are ignored.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgb<u8>, coverage: u8) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    if coverage == u8::MAX {
        *dst = image::Rgba([color[0], color[1], color[2], u8::MAX]);
        return;
    }
    let a = coverage as f32 / 255.0;
    for i in 0..3 {
        dst[i] = (color[i] as f32 * a + dst[i] as f32 * (1.0 - a)).round() as u8;
    }
    dst[3] = (255.0 * a + dst[3] as f32 * (1.0 - a)).round() as u8;
}

/// Draw each placed line at its origin.
pub fn draw_lines(canvas: &mut RgbaImage, lines: &[PlacedLine], face: &Face, color: Rgb<u8>) {
    for line in lines {
        face.draw(canvas, &line.text, line.x, line.y, color);
    }
}

/// Break, lay out and draw `text` inside the box described by `spec`.
///
/// Returns the placed lines so callers can inspect where text landed.
pub fn render_text(
    canvas: &mut RgbaImage,
    text: &str,
    spec: &TextBlockSpec,
    face: &Face,
) -> Vec<PlacedLine> {
    let lines = break_lines(text, spec.bounds.width, face);
    let placed = layout_lines(
        &lines,
        face,
        spec.bounds,
        spec.align,
        spec.vertical_align,
        spec.font_size,
    );
    tracing::debug!(lines = placed.len(), "rendering caption");
    draw_lines(canvas, &placed, face, spec.color);
    placed
}
