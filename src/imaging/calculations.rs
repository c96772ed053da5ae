//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::CropSpec;

/// Rectangle retained by a crop, as `(left, top)` origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Calculate the crop box `(left, top, W - right, H - bottom)`.
///
/// Returns `None` when the insets leave nothing: `left >= W - right` or
/// `top >= H - bottom`. Insets larger than the image count as invalid too.
///
/// # Examples
/// ```
/// # use screenshot_cropper::imaging::{CropSpec, calculate_crop_box};
/// let spec = CropSpec::new(50, 0, 0, 0);
/// let crop = calculate_crop_box((800, 600), &spec).unwrap();
/// assert_eq!((crop.width, crop.height), (800, 550));
/// ```
pub fn calculate_crop_box(dims: (u32, u32), spec: &CropSpec) -> Option<CropBox> {
    let (width, height) = dims;
    let right = width.checked_sub(spec.right)?;
    let bottom = height.checked_sub(spec.bottom)?;

    if spec.left >= right || spec.top >= bottom {
        return None;
    }

    Some(CropBox {
        left: spec.left,
        top: spec.top,
        width: right - spec.left,
        height: bottom - spec.top,
    })
}

/// Calculate dimensions that scale `source` to `target_width`, keeping aspect.
///
/// Height is `floor(target_width * src_h / src_w)`, never less than 1.
///
/// # Examples
/// ```
/// # use screenshot_cropper::imaging::calculate_fit_width;
/// // 800x550 at width 1000 → 1000x687 (687.5 floored)
/// assert_eq!(calculate_fit_width((800, 550), 1000), (1000, 687));
/// ```
pub fn calculate_fit_width(source: (u32, u32), target_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return (target_width, src_h.max(1));
    }
    let h = (target_width as u64 * src_h as u64 / src_w as u64) as u32;
    (target_width, h.max(1))
}
