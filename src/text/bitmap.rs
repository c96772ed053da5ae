//! Built-in bitmap face, used when no outline font could be loaded.
//!
//! Glyphs come from the `embedded-graphics` 6×10 ASCII mono font. Text is
//! rasterized once at unit scale into a list of inked cell pixels, then each
//! pixel is blown up by an integer factor derived from the requested font
//! size so captions stay legible at large sizes. Characters outside ASCII
//! draw as `?`.

use super::TextMeasure;
use super::render::blend_pixel;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::{Rgb, RgbaImage};
use std::convert::Infallible;

const FONT: MonoFont<'static> = FONT_6X10;
const CELL_WIDTH: u32 = FONT.character_size.width + FONT.character_spacing;
const CELL_HEIGHT: u32 = FONT.character_size.height;

/// Draw target that records lit pixels instead of painting them.
#[derive(Default)]
struct Ink(Vec<Point>);

impl OriginDimensions for Ink {
    fn size(&self) -> Size {
        Size::new(u16::MAX.into(), u16::MAX.into())
    }
}

impl DrawTarget for Ink {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.0.extend(
            pixels
                .into_iter()
                .filter(|&Pixel(_, color)| color.is_on())
                .map(|Pixel(point, _)| point),
        );
        Ok(())
    }
}

/// Lit pixels of `text` at unit scale, relative to the first cell's top-left.
fn ink(text: &str) -> Vec<Point> {
    let mut ink = Ink::default();
    let style = MonoTextStyle::new(&FONT, BinaryColor::On);
    let Ok(_) = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut ink);
    ink.0
}

/// The built-in face at an integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    /// Face scaled for a font size: `max(1, round(px / cell height))`.
    pub fn for_size(px: u32) -> Self {
        Self {
            scale: (px.saturating_add(CELL_HEIGHT / 2) / CELL_HEIGHT).max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Draw `text` with its cell's top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i64, y: i64, color: Rgb<u8>) {
        let s = self.scale as i64;
        let (width, height) = (canvas.width() as i64, canvas.height() as i64);
        for point in ink(text) {
            let left = x + point.x as i64 * s;
            let top = y + point.y as i64 * s;
            for py in top.max(0)..(top + s).min(height) {
                for px in left.max(0)..(left + s).min(width) {
                    blend_pixel(canvas, px, py, color, u8::MAX);
                }
            }
        }
    }
}

impl TextMeasure for BitmapFont {
    fn text_width(&self, text: &str) -> u32 {
        u32::try_from(text.chars().count())
            .unwrap_or(u32::MAX)
            .saturating_mul(CELL_WIDTH)
            .saturating_mul(self.scale)
    }

    fn text_height(&self, text: &str) -> u32 {
        let rows = ink(text).iter().map(|p| p.y).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((top, bottom)) => Some((top.min(y), bottom.max(y))),
        });
        match rows {
            Some((top, bottom)) => ((bottom - top + 1) as u32).saturating_mul(self.scale),
            None => CELL_HEIGHT.saturating_mul(self.scale),
        }
    }
}
