//! # Screenshot Cropper
//!
//! Batch-generates localized store screenshots. Each source screenshot is
//! cropped, scaled onto a background, captioned with the text for every
//! locale, optionally framed by an overlay, and written once per locale.
//!
//! # Architecture: Discover → Plan → Compose
//!
//! ```text
//! 1. Discover   input/screenshots/ + input/locales/*.json   →  assets, locale texts
//! 2. Plan       assets × locales                             →  CompositionJobs
//! 3. Compose    each job, in parallel                        →  output/{locale}/{name}_{locale}.png
//! ```
//!
//! Jobs are independent. The [`compose::Compositor`] is built once per run
//! (settings, asset roots and preloaded fonts) and shared read-only by every
//! worker; the locale reaches the text renderer as an explicit argument.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `screenshot-cropper.json` loading, stock defaults, clamping into typed settings |
//! | [`paths`] | Directory and config-file project layouts, asset and font lookup |
//! | [`scan`] | Screenshot discovery |
//! | [`naming`] | Screenshot numbers and output file names |
//! | [`locale`] | Locale text files and the [`locale::LocaleProvider`] trait |
//! | [`imaging`] | Crop, resize, paste and alpha overlay behind an I/O backend trait |
//! | [`text`] | Greedy word wrap, alignment, font loading and glyph rasterization |
//! | [`compose`] | One job: crop → background → caption → overlay → save, with fallbacks |
//! | [`process`] | Batch planning and the parallel run |
//! | [`template`] | Translation-key templates for design files |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Abort
//!
//! Only an unreadable source screenshot fails a job. A missing background or
//! overlay, an unloadable font or a failing composite step still produces an
//! output (at worst the cropped screenshot alone), and the job is reported as
//! degraded. A batch of N jobs always attempts all N.
//!
//! ## Built-In Fallback Font
//!
//! Captions never disappear because a font file is missing. The [`text`]
//! module carries the `embedded-graphics` 6×10 mono face, scaled to the
//! requested size and used whenever the configured font cannot be loaded.
//!
//! ## Self-Contained Imaging
//!
//! Decoding, resampling (Lanczos3), PNG and lossless WebP encoding use the
//! `image` crate. Lossy WebP goes through `webp`, which builds its own
//! libwebp. Glyphs are rasterized with `fontdue`. No system libraries are
//! needed.

pub mod compose;
pub mod config;
pub mod imaging;
pub mod locale;
pub mod naming;
pub mod output;
pub mod paths;
pub mod process;
pub mod scan;
pub mod template;
pub mod text;

#[cfg(test)]
pub(crate) mod test_helpers;
