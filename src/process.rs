//! Batch runner: every screenshot, every locale.
//!
//! Discovers the source screenshots, loads the locale texts, expands them into
//! one [`CompositionJob`] per (screenshot, locale) pair and runs the jobs on
//! the rayon pool. Jobs share nothing but the read-only [`Compositor`], so
//! they run in any order.
//!
//! ## Output Structure
//!
//! ```text
//! output/
//! ├── de/
//! │   ├── 1_de.png
//! │   └── 2_de.png
//! ├── en/
//! │   ├── 1_en.png
//! │   └── 2_en.png
//! └── cropped/          # only with export.keep_cropped
//!     ├── 1.png
//!     └── 2.png
//! ```
//!
//! Without text settings or without any locale file, one job per screenshot
//! writes `output/{name}.{ext}`.
//!
//! ## Text Index
//!
//! A screenshot named with a number (`3.png`, `screenshot_03.png`) gets
//! `Text_3`. One without a number gets the text at its sorted position,
//! counting from `Text_1`.
//!
//! ## Failure Policy
//!
//! One job failing never stops the batch. Each finished job is reported as a
//! [`ProcessEvent`] and counted in the [`BatchSummary`].

use crate::compose::{
    ComposeReport, CompositionJob, CompositionSettings, Compositor, Degradation,
};
use crate::config::ScreenshotConfig;
use crate::imaging::{CropSkipped, Dimensions, ImageBackend, RustBackend};
use crate::locale::{JsonLocales, LocaleError, LocaleProvider};
use crate::naming::{cropped_output_path, localized_output_path, plain_output_path};
use crate::paths::ProjectPaths;
use crate::scan::{Asset, ScanError, discover_assets};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Locale loading failed: {0}")]
    Locale(#[from] LocaleError),
}

/// Command-line filters for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Only screenshots whose file name carries this number.
    pub screenshot: Option<u32>,
    /// Only this locale.
    pub language: Option<String>,
    /// Leave existing output files alone.
    pub skip_existing: bool,
}

/// How a single job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Composited,
    Degraded(Vec<Degradation>),
    Failed(String),
    /// Output already existed and `skip_existing` was set.
    Skipped,
}

impl JobStatus {
    fn from_report(report: &ComposeReport) -> Self {
        if report.is_degraded() {
            Self::Degraded(report.degradations.clone())
        } else {
            Self::Composited
        }
    }
}

/// Progress events streamed while the batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted {
        assets: usize,
        locales: Vec<String>,
        jobs: usize,
    },
    JobFinished {
        /// 1-based position in the job list.
        index: usize,
        source: PathBuf,
        locale: Option<String>,
        output: PathBuf,
        crop_skipped: Option<CropSkipped>,
        status: JobStatus,
    },
}

/// Per-run counts, one per [`JobStatus`] kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub composited: usize,
    pub degraded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn record(&mut self, status: &JobStatus) {
        match status {
            JobStatus::Composited => self.composited += 1,
            JobStatus::Degraded(_) => self.degraded += 1,
            JobStatus::Failed(_) => self.failed += 1,
            JobStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.composited + self.degraded + self.failed + self.skipped
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Locale text for one asset at its sorted `position`.
fn text_for(
    locales: &impl LocaleProvider,
    locale: &str,
    asset: &Asset,
    position: usize,
) -> Option<String> {
    match asset.number {
        Some(number) => locales.get_text(locale, number, false),
        None => {
            let position = u32::try_from(position).unwrap_or(u32::MAX);
            locales.get_text(locale, position, true)
        }
    }
}

/// Expand assets and locales into composition jobs.
///
/// `assets` must be the full sorted listing: sequential text positions are
/// taken before the `screenshot` filter is applied.
pub fn plan_jobs(
    assets: &[Asset],
    locales: &impl LocaleProvider,
    settings: &CompositionSettings,
    paths: &ProjectPaths,
    options: &BatchOptions,
) -> Vec<CompositionJob> {
    let format = settings.export.format;
    let locale_codes: Vec<String> = locales
        .locales()
        .into_iter()
        .filter(|code| options.language.as_deref().is_none_or(|l| l == code))
        .collect();
    let localized = settings.text.is_some() && !locale_codes.is_empty();

    let mut jobs = Vec::new();
    for (position, asset) in assets.iter().enumerate() {
        if options.screenshot.is_some_and(|n| asset.number != Some(n)) {
            continue;
        }
        let mut cropped_output = settings
            .export
            .keep_cropped
            .then(|| cropped_output_path(&paths.cropped_dir(), &asset.stem, format));

        if !localized {
            jobs.push(CompositionJob {
                source: asset.path.clone(),
                output: plain_output_path(&paths.output, &asset.stem, format),
                cropped_output,
                text: None,
                locale: None,
            });
            continue;
        }

        for code in &locale_codes {
            jobs.push(CompositionJob {
                source: asset.path.clone(),
                output: localized_output_path(&paths.output, &asset.stem, code, format),
                // First locale writes the cropped copy; the rest would repeat it
                cropped_output: cropped_output.take(),
                text: text_for(locales, code, asset, position),
                locale: Some(code.clone()),
            });
        }
    }
    jobs
}

/// Run jobs in parallel, streaming one event per finished job.
pub fn run_jobs<B: ImageBackend>(
    compositor: &Compositor<B>,
    jobs: &[CompositionJob],
    skip_existing: bool,
    progress: Option<Sender<ProcessEvent>>,
) -> BatchSummary {
    let statuses: Vec<JobStatus> = jobs
        .par_iter()
        .enumerate()
        .map_with(progress, |progress, (index, job)| {
            let (status, crop_skipped) = if skip_existing && job.output.exists() {
                tracing::debug!(output = %job.output.display(), "output exists, skipping");
                (JobStatus::Skipped, None)
            } else {
                match compositor.compose(job) {
                    Ok(report) => (JobStatus::from_report(&report), report.crop_skipped),
                    Err(e) => {
                        tracing::error!(error = %e, "job failed");
                        (JobStatus::Failed(e.to_string()), None)
                    }
                }
            };
            if let Some(tx) = progress {
                tx.send(ProcessEvent::JobFinished {
                    index: index + 1,
                    source: job.source.clone(),
                    locale: job.locale.clone(),
                    output: job.output.clone(),
                    crop_skipped,
                    status: status.clone(),
                })
                .ok();
            }
            status
        })
        .collect();

    let mut summary = BatchSummary::default();
    for status in &statuses {
        summary.record(status);
    }
    summary
}

/// Run the whole batch for a project with the pure-Rust backend.
pub fn process(
    paths: &ProjectPaths,
    config: &ScreenshotConfig,
    options: &BatchOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    process_with_backend(RustBackend::new(), paths, config, options, progress)
}

/// Run the batch with a specific backend (allows testing with mock).
pub fn process_with_backend<B: ImageBackend>(
    backend: B,
    paths: &ProjectPaths,
    config: &ScreenshotConfig,
    options: &BatchOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    let assets = discover_assets(&paths.screenshots)?;
    let locales = load_locales(paths, options)?;
    let settings = CompositionSettings::from_config(config);

    let jobs = plan_jobs(&assets, &locales, &settings, paths, options);
    tracing::info!(
        assets = assets.len(),
        locales = locales.locales().len(),
        jobs = jobs.len(),
        "starting batch"
    );
    if let Some(tx) = &progress {
        tx.send(ProcessEvent::BatchStarted {
            assets: assets.len(),
            locales: locales.locales(),
            jobs: jobs.len(),
        })
        .ok();
    }

    std::fs::create_dir_all(&paths.output)?;
    let compositor = Compositor::new(backend, settings, paths.asset_roots());
    Ok(run_jobs(&compositor, &jobs, options.skip_existing, progress))
}

fn load_locales(paths: &ProjectPaths, options: &BatchOptions) -> Result<JsonLocales, ProcessError> {
    match &paths.locales {
        Some(dir) => Ok(JsonLocales::load(dir, options.language.as_deref())?),
        None => Ok(JsonLocales::default()),
    }
}

/// One screenshot as seen by `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCheck {
    pub asset: Asset,
    /// `Err` holds the reason the file cannot be read.
    pub dimensions: Result<Dimensions, String>,
}

/// What a batch run would see, without rendering anything.
#[derive(Debug, Clone)]
pub struct ProjectCheck {
    pub assets: Vec<AssetCheck>,
    pub locales: Vec<String>,
    pub jobs: usize,
}

/// Identify every screenshot and count the jobs a run would produce.
pub fn check_project(
    backend: &impl ImageBackend,
    paths: &ProjectPaths,
    config: &ScreenshotConfig,
) -> Result<ProjectCheck, ProcessError> {
    let assets = discover_assets(&paths.screenshots)?;
    let options = BatchOptions::default();
    let locales = load_locales(paths, &options)?;
    let settings = CompositionSettings::from_config(config);
    let jobs = plan_jobs(&assets, &locales, &settings, paths, &options).len();

    let assets = assets
        .into_iter()
        .map(|asset| AssetCheck {
            dimensions: backend.identify(&asset.path).map_err(|e| e.to_string()),
            asset,
        })
        .collect();

    Ok(ProjectCheck {
        assets,
        locales: locales.locales(),
        jobs,
    })
}
