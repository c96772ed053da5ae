//! Image processing with no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Crop** | `DynamicImage::crop_imm` inside the computed crop box |
//! | **Resize** | Lanczos3, width authoritative, height from aspect ratio |
//! | **Paste / overlay** | `imageops::replace` / `imageops::overlay` |
//! | **Encode** | PNG, WebP (lossless or at the export quality) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and resize geometry (unit testable)
//! - **Parameters**: Data structures describing the configured operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: In-memory pixel operations combining calculations with `image`

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CropBox, calculate_crop_box, calculate_fit_width};
pub use operations::{
    CropOutcome, CropSkipped, crop, discard_alpha, overlay_alpha, paste, resize_to_width,
};
pub use params::{CropSpec, ExportFormat, ExportSpec, OverlaySpec, PlacementSpec, Quality};
pub use rust_backend::{RustBackend, supported_input_extensions};
