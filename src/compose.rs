//! Single-screenshot compositing.
//!
//! One [`CompositionJob`] turns one source screenshot into one output file:
//!
//! ```text
//! load ─► crop ─┬─ no background ──────────────────────────────► save cropped
//!               └─ background ─► resize to width ─► paste ─► caption ─► overlay ─► save
//!                                 (any failure here) ─────────────────────► save cropped
//! ```
//!
//! Only an unreadable source (or an output that cannot be written at all)
//! fails the job. Every other problem degrades it: the layer is skipped or
//! the cropped image is written on its own, and the [`ComposeReport`] lists
//! what happened so the batch summary can count degraded outputs.
//!
//! Text and overlay are applied only on top of a background. Without a
//! `background` section the cropped screenshot is the final output.

use crate::config::ScreenshotConfig;
use crate::imaging::{
    BackendError, CropSkipped, CropSpec, ExportSpec, ImageBackend, OverlaySpec, PlacementSpec,
    crop, discard_alpha, overlay_alpha, paste, resize_to_width,
};
use crate::paths::AssetRoots;
use crate::text::{FontLibrary, TextBlockSpec, render_text};
use image::{DynamicImage, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("cannot read source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        source: BackendError,
    },
    #[error("cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        source: BackendError,
    },
}

/// Batch-wide settings, fixed for the whole run.
#[derive(Debug, Clone, Default)]
pub struct CompositionSettings {
    pub crop: CropSpec,
    pub background: Option<PlacementSpec>,
    pub text: Option<TextBlockSpec>,
    pub overlay: Option<OverlaySpec>,
    pub export: ExportSpec,
}

impl CompositionSettings {
    pub fn from_config(config: &ScreenshotConfig) -> Self {
        Self {
            crop: config.crop_settings(),
            background: config.background_settings(),
            text: config.text_settings(),
            overlay: config.overlay_settings(),
            export: config.export_settings(),
        }
    }
}

/// One (screenshot, locale) pair to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionJob {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Where to also write the cropped image, when `keep_cropped` is on.
    pub cropped_output: Option<PathBuf>,
    pub text: Option<String>,
    pub locale: Option<String>,
}

/// A layer or step that did not make it into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    BackgroundMissing(String),
    OverlayMissing(String),
    FontFallback { locale: Option<String>, file: String },
    CompositeStepFailed(String),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackgroundMissing(file) => write!(f, "background not found: {file}"),
            Self::OverlayMissing(file) => write!(f, "overlay not found: {file}"),
            Self::FontFallback { locale, file } => match locale {
                Some(l) => write!(f, "font {file} unavailable for {l}, used built-in font"),
                None => write!(f, "font {file} unavailable, used built-in font"),
            },
            Self::CompositeStepFailed(msg) => write!(f, "composite failed: {msg}"),
        }
    }
}

/// What ended up in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The cropped screenshot alone.
    CroppedOnly,
    /// Background composite, with caption and overlay where configured.
    Composited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeReport {
    pub output: PathBuf,
    pub stage: Stage,
    pub crop_skipped: Option<CropSkipped>,
    pub degradations: Vec<Degradation>,
}

impl ComposeReport {
    /// True when a configured layer or step was dropped.
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Composites jobs with a fixed set of settings, fonts and asset roots.
///
/// Holds no per-job state, so one compositor serves every worker thread.
pub struct Compositor<B: ImageBackend> {
    backend: B,
    settings: CompositionSettings,
    roots: AssetRoots,
    fonts: FontLibrary,
}

impl<B: ImageBackend> Compositor<B> {
    /// Build a compositor, loading the caption fonts once.
    pub fn new(backend: B, settings: CompositionSettings, roots: AssetRoots) -> Self {
        let fonts = match &settings.text {
            Some(text) => FontLibrary::load(text, &roots),
            None => FontLibrary::default(),
        };
        Self::with_fonts(backend, settings, roots, fonts)
    }

    pub fn with_fonts(
        backend: B,
        settings: CompositionSettings,
        roots: AssetRoots,
        fonts: FontLibrary,
    ) -> Self {
        Self {
            backend,
            settings,
            roots,
            fonts,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[tracing::instrument(skip_all, fields(source = %job.source.display(), locale = job.locale.as_deref()))]
    pub fn compose(&self, job: &CompositionJob) -> Result<ComposeReport, ComposeError> {
        let source = self
            .backend
            .load(&job.source)
            .map_err(|source| ComposeError::SourceUnreadable {
                path: job.source.clone(),
                source,
            })?;

        let outcome = crop(source, &self.settings.crop);
        let crop_skipped = outcome.skipped();
        if let Some(reason) = &crop_skipped {
            tracing::warn!(%reason, "crop skipped, using the uncropped image");
        }
        let cropped = outcome.into_image();

        if let Some(path) = &job.cropped_output {
            match self.backend.save(&cropped, path, &self.settings.export) {
                Ok(()) => tracing::debug!(path = %path.display(), "saved cropped copy"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to save cropped copy"),
            }
        }

        let mut degradations = Vec::new();
        let Some(placement) = &self.settings.background else {
            self.save_cropped(&cropped, &job.output)?;
            return Ok(self.report(job, Stage::CroppedOnly, crop_skipped, degradations));
        };

        let composite = match self.composite(&cropped, placement, job, &mut degradations) {
            Ok(canvas) => canvas,
            Err(msg) => {
                tracing::error!(error = %msg, "composite failed, saving cropped image");
                degradations.push(Degradation::CompositeStepFailed(msg));
                None
            }
        };

        let stage = match composite {
            Some(canvas) => {
                let image = DynamicImage::ImageRgba8(canvas);
                match self.backend.save(&image, &job.output, &self.settings.export) {
                    Ok(()) => Stage::Composited,
                    Err(e) => {
                        tracing::error!(error = %e, "saving composite failed, saving cropped image");
                        degradations.push(Degradation::CompositeStepFailed(e.to_string()));
                        self.save_cropped(&cropped, &job.output)?;
                        Stage::CroppedOnly
                    }
                }
            }
            None => {
                self.save_cropped(&cropped, &job.output)?;
                Stage::CroppedOnly
            }
        };

        tracing::info!(output = %job.output.display(), ?stage, "saved");
        Ok(self.report(job, stage, crop_skipped, degradations))
    }

    /// Background, caption and overlay. `Ok(None)` means the background is
    /// missing; `Err` carries the message of the step that failed.
    fn composite(
        &self,
        cropped: &DynamicImage,
        placement: &PlacementSpec,
        job: &CompositionJob,
        degradations: &mut Vec<Degradation>,
    ) -> Result<Option<RgbaImage>, String> {
        let Some(bg_path) = self.roots.resolve(&placement.file) else {
            tracing::warn!(file = %placement.file, "background not found, saving cropped image");
            degradations.push(Degradation::BackgroundMissing(placement.file.clone()));
            return Ok(None);
        };
        let background = self
            .backend
            .load(&bg_path)
            .map_err(|e| format!("background {}: {e}", bg_path.display()))?;

        let mut foreground = resize_to_width(cropped, placement.target_width).to_rgba8();
        if !background.color().has_alpha() {
            // An opaque background stays opaque under the screenshot
            discard_alpha(&mut foreground);
        }
        let mut canvas = background.to_rgba8();
        paste(&mut canvas, &foreground, placement.x as i64, placement.y as i64);

        if let (Some(spec), Some(text)) = (&self.settings.text, &job.text) {
            self.draw_caption(&mut canvas, text, spec, job.locale.as_deref(), degradations);
        }

        if let Some(overlay) = &self.settings.overlay {
            self.apply_overlay(&mut canvas, overlay, degradations)?;
        }

        Ok(Some(canvas))
    }

    fn draw_caption(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        spec: &TextBlockSpec,
        locale: Option<&str>,
        degradations: &mut Vec<Degradation>,
    ) {
        let selected = self.fonts.face(locale, spec.font_size);
        if selected.fallback {
            degradations.push(Degradation::FontFallback {
                locale: locale.map(str::to_string),
                file: selected.file.clone(),
            });
        }
        let lines = render_text(canvas, text, spec, &selected.face);
        tracing::debug!(lines = lines.len(), font = %selected.file, "caption drawn");
    }

    fn apply_overlay(
        &self,
        canvas: &mut RgbaImage,
        overlay: &OverlaySpec,
        degradations: &mut Vec<Degradation>,
    ) -> Result<(), String> {
        let Some(path) = self.roots.resolve(&overlay.file) else {
            tracing::warn!(file = %overlay.file, "overlay not found, skipping");
            degradations.push(Degradation::OverlayMissing(overlay.file.clone()));
            return Ok(());
        };
        let layer = self
            .backend
            .load(&path)
            .map_err(|e| format!("overlay {}: {e}", path.display()))?;
        overlay_alpha(canvas, &layer.to_rgba8(), overlay.x, overlay.y);
        Ok(())
    }

    fn save_cropped(&self, cropped: &DynamicImage, output: &Path) -> Result<(), ComposeError> {
        self.backend
            .save(cropped, output, &self.settings.export)
            .map_err(|source| ComposeError::OutputWrite {
                path: output.to_path_buf(),
                source,
            })
    }

    fn report(
        &self,
        job: &CompositionJob,
        stage: Stage,
        crop_skipped: Option<CropSkipped>,
        degradations: Vec<Degradation>,
    ) -> ComposeReport {
        ComposeReport {
            output: job.output.clone(),
            stage,
            crop_skipped,
            degradations,
        }
    }
}
