//! High-level image operations.
//!
//! These functions combine the pure calculations with in-memory pixel work.
//! None of them touch the filesystem; decoding and encoding belong to the
//! [`backend`](super::backend).

use super::calculations::{calculate_crop_box, calculate_fit_width};
use super::params::CropSpec;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use thiserror::Error;

/// The configured insets leave no pixels; the image was kept uncropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid crop box for {width}x{height} image ({spec})")]
pub struct CropSkipped {
    pub width: u32,
    pub height: u32,
    pub spec: CropSpec,
}

/// Result of [`crop`]: either the cropped pixels or the untouched input.
#[derive(Debug, Clone)]
pub enum CropOutcome {
    Cropped(DynamicImage),
    Skipped {
        image: DynamicImage,
        reason: CropSkipped,
    },
}

impl CropOutcome {
    pub fn image(&self) -> &DynamicImage {
        match self {
            Self::Cropped(image) | Self::Skipped { image, .. } => image,
        }
    }

    pub fn into_image(self) -> DynamicImage {
        match self {
            Self::Cropped(image) | Self::Skipped { image, .. } => image,
        }
    }

    pub fn skipped(&self) -> Option<CropSkipped> {
        match self {
            Self::Cropped(_) => None,
            Self::Skipped { reason, .. } => Some(*reason),
        }
    }
}

/// Cut the inset rectangle out of `image`. No padding, no scaling.
///
/// An invalid box returns the original image together with a [`CropSkipped`]
/// reason; callers log it and carry on.
pub fn crop(image: DynamicImage, spec: &CropSpec) -> CropOutcome {
    let (width, height) = image.dimensions();
    match calculate_crop_box((width, height), spec) {
        Some(crop) if crop.width == width && crop.height == height => CropOutcome::Cropped(image),
        Some(crop) => CropOutcome::Cropped(image.crop_imm(
            crop.left,
            crop.top,
            crop.width,
            crop.height,
        )),
        None => CropOutcome::Skipped {
            image,
            reason: CropSkipped {
                width,
                height,
                spec: *spec,
            },
        },
    }
}

/// Resize to `target_width`, deriving height from the image's own aspect ratio.
pub fn resize_to_width(image: &DynamicImage, target_width: u32) -> DynamicImage {
    let (w, h) = calculate_fit_width(image.dimensions(), target_width);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    image.resize_exact(w, h, FilterType::Lanczos3)
}

/// Copy `layer` onto `canvas` at `(x, y)`, replacing pixels (no blending).
/// Parts falling outside the canvas are dropped.
pub fn paste(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    imageops::replace(canvas, layer, x, y);
}

/// Make every pixel fully opaque, keeping its color channels.
///
/// Pasting into a canvas without an alpha channel keeps only the layer's
/// color, so transparent areas show whatever color they carry.
pub fn discard_alpha(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        pixel[3] = u8::MAX;
    }
}

/// Alpha-composite `layer` over `canvas` at `(x, y)`, source-over.
pub fn overlay_alpha(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(canvas, layer, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
        }))
    }

    #[test]
    fn zero_crop_is_pixel_identical() {
        let img = gradient(37, 21);
        let outcome = crop(img.clone(), &CropSpec::default());

        assert!(outcome.skipped().is_none());
        assert_eq!(outcome.image().to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn crop_removes_insets() {
        let outcome = crop(gradient(100, 80), &CropSpec::new(10, 5, 15, 20));
        let img = outcome.into_image();

        assert_eq!(img.dimensions(), (80, 50));
        // Top-left pixel came from (5, 10) in the source
        assert_eq!(img.to_rgba8().get_pixel(0, 0), &Rgba([5, 10, 7, 255]));
    }

    #[test]
    fn invalid_crop_returns_original_and_reason() {
        let img = gradient(100, 100);
        let spec = CropSpec::new(60, 0, 0, 60);
        let outcome = crop(img.clone(), &spec);

        let reason = outcome.skipped().expect("crop should be skipped");
        assert_eq!(reason.width, 100);
        assert_eq!(reason.spec, spec);
        assert_eq!(outcome.image().to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn end_to_end_crop_dimensions() {
        let outcome = crop(gradient(800, 600), &CropSpec::new(50, 0, 0, 0));
        assert_eq!(outcome.image().dimensions(), (800, 550));
    }

    #[test]
    fn resize_to_width_keeps_aspect() {
        let resized = resize_to_width(&gradient(800, 550), 1000);
        assert_eq!(resized.dimensions(), (1000, 687));
    }

    #[test]
    fn paste_replaces_pixels_without_blending() {
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let layer = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 0]));

        paste(&mut canvas, &layer, 3, 4);

        assert_eq!(canvas.get_pixel(3, 4), &Rgba([0, 0, 255, 0]));
        assert_eq!(canvas.get_pixel(5, 4), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn discard_alpha_keeps_color_channels() {
        let mut layer = RgbaImage::from_pixel(2, 1, Rgba([12, 34, 56, 0]));
        layer.put_pixel(1, 0, Rgba([1, 2, 3, 128]));

        discard_alpha(&mut layer);

        assert_eq!(layer.get_pixel(0, 0), &Rgba([12, 34, 56, 255]));
        assert_eq!(layer.get_pixel(1, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn paste_clips_at_canvas_edge() {
        let mut canvas = RgbaImage::new(4, 4);
        let layer = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));

        paste(&mut canvas, &layer, 2, 2);

        assert_eq!(canvas.get_pixel(3, 3), &Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.get_pixel(1, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn overlay_respects_alpha() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255]));
        let mut layer = RgbaImage::new(2, 1);
        layer.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        layer.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        overlay_alpha(&mut canvas, &layer, 1, 1);

        assert_eq!(canvas.get_pixel(1, 1), &Rgba([0, 0, 0, 255]));
        // Fully transparent overlay pixel leaves the canvas untouched
        assert_eq!(canvas.get_pixel(2, 1), &Rgba([200, 200, 200, 255]));
    }
}
