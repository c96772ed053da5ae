//! Pure Rust image I/O backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (PNG, JPEG, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP, lossless | `image::codecs::webp::WebPEncoder::new_lossless` |
//! | Encode → WebP, lossy | `webp::Encoder` at the export quality |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{ExportFormat, ExportSpec};
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::sync::LazyLock;

/// Screenshot extensions paired with the decoder that handles them.
const SCREENSHOT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    SCREENSHOT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn create_parent(path: &Path) -> Result<(), BackendError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        // create_dir_all tolerates a concurrent creator winning the race
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let writer = BufWriter::new(fs::File::create(path)?);
    image
        .write_with_encoder(PngEncoder::new(writer))
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))
}

fn save_webp(image: &DynamicImage, path: &Path, export: &ExportSpec) -> Result<(), BackendError> {
    // Both WebP encoders only accept 8-bit RGB(A)
    let converted;
    let image = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
        other => {
            converted = DynamicImage::ImageRgba8(other.to_rgba8());
            &converted
        }
    };

    if export.lossless {
        let writer = BufWriter::new(fs::File::create(path)?);
        return image
            .write_with_encoder(WebPEncoder::new_lossless(writer))
            .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e}")));
    }

    let encoder = webp::Encoder::from_image(image)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e}")))?;
    let data = encoder.encode(export.quality.value() as f32);
    fs::write(path, &*data)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::Decode(format!("Failed to read dimensions of {}: {e}", path.display()))
        })?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(format!("Failed to decode {}: {e}", path.display())))
    }

    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        export: &ExportSpec,
    ) -> Result<(), BackendError> {
        create_parent(path)?;
        match export.format {
            ExportFormat::Png => save_png(image, path),
            ExportFormat::Webp => save_webp(image, path, export),
        }
    }
}
