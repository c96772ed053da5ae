//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the compositor (pure pixel
//! work on in-memory images) and the filesystem: every decode and every
//! encode goes through it. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::ExportSpec;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image I/O backends.
///
/// `Sync` so a single backend can be shared by rayon workers.
pub trait ImageBackend: Sync {
    /// Read image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image from disk.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path` per `export`. Parent directories are created
    /// if absent.
    fn save(&self, image: &DynamicImage, path: &Path, export: &ExportSpec)
    -> Result<(), BackendError>;
}
