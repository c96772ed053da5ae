//! CLI output formatting.
//!
//! Every job is shown by its positional index and source file name, with the
//! output path and outcome as indented context lines. Diagnostics go through
//! `tracing` on stderr; this module only produces the stdout report.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! Screenshots: 2, locales: de, en → 4 jobs
//! 001 1.png [de]
//!     Output: output/de/1_de.png
//!     composited
//! 002 1.png [en]
//!     Output: output/en/1_en.png
//!     degraded: overlay not found: frame.png
//! 003 2.png [de]
//!     failed: cannot read source input/screenshots/2.png: Decode failed: ...
//!
//! Processed 4 jobs: 2 composited, 1 degraded, 1 failed, 0 skipped
//! ```
//!
//! ## Check
//!
//! ```text
//! Config
//!     screenshot-cropper.json
//! Screenshots (2)
//! 001 1.png 1170x2532
//! 002 cover.png 1170x2532
//!     Text: by position
//! Locales (2)
//!     de, en
//! Jobs: 4
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::process::{BatchSummary, JobStatus, ProcessEvent, ProjectCheck};
use crate::paths::ProjectPaths;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `001 1.png [de]`, or without the bracket when no locale applies.
fn job_header(index: usize, source: &Path, locale: Option<&str>) -> String {
    match locale {
        Some(l) => format!("{} {} [{}]", format_index(index), file_name(source), l),
        None => format!("{} {}", format_index(index), file_name(source)),
    }
}

// ============================================================================
// Process
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            assets,
            locales,
            jobs,
        } => {
            let locales = if locales.is_empty() {
                "none".to_string()
            } else {
                locales.join(", ")
            };
            vec![format!(
                "Screenshots: {}, locales: {} \u{2192} {} jobs",
                assets, locales, jobs
            )]
        }
        ProcessEvent::JobFinished {
            index,
            source,
            locale,
            output,
            crop_skipped,
            status,
        } => {
            let mut lines = vec![job_header(*index, source, locale.as_deref())];
            if !matches!(status, JobStatus::Failed(_)) {
                lines.push(format!("{}Output: {}", indent(1), output.display()));
            }
            if let Some(reason) = crop_skipped {
                lines.push(format!("{}crop skipped: {}", indent(1), reason));
            }
            match status {
                JobStatus::Composited => lines.push(format!("{}composited", indent(1))),
                JobStatus::Degraded(reasons) => {
                    for reason in reasons {
                        lines.push(format!("{}degraded: {}", indent(1), reason));
                    }
                }
                JobStatus::Failed(message) => {
                    lines.push(format!("{}failed: {}", indent(1), message));
                }
                JobStatus::Skipped => lines.push(format!("{}skipped: output exists", indent(1))),
            }
            lines
        }
    }
}

/// Format the end-of-run counts.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Processed {} jobs: {} composited, {} degraded, {} failed, {} skipped",
            summary.total(),
            summary.composited,
            summary.degraded,
            summary.failed,
            summary.skipped
        ),
    ]
}

pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the `check` report: config, screenshots, locales, job count.
pub fn format_check(check: &ProjectCheck, paths: &ProjectPaths) -> Vec<String> {
    let mut lines = vec![
        "Config".to_string(),
        format!("{}{}", indent(1), paths.config_file.display()),
        format!("Screenshots ({})", check.assets.len()),
    ];

    for (i, entry) in check.assets.iter().enumerate() {
        let header = format!("{} {}", format_index(i + 1), file_name(&entry.asset.path));
        match &entry.dimensions {
            Ok(dims) => lines.push(format!("{} {}x{}", header, dims.width, dims.height)),
            Err(e) => lines.push(format!("{} (unreadable: {})", header, e)),
        }
        if entry.asset.number.is_none() {
            lines.push(format!("{}Text: by position", indent(1)));
        }
    }

    lines.push(format!("Locales ({})", check.locales.len()));
    if !check.locales.is_empty() {
        lines.push(format!("{}{}", indent(1), check.locales.join(", ")));
    }
    lines.push(format!("Jobs: {}", check.jobs));
    lines
}

pub fn print_check(check: &ProjectCheck, paths: &ProjectPaths) {
    for line in format_check(check, paths) {
        println!("{}", line);
    }
}

// ============================================================================
// Template
// ============================================================================

/// Format the keys written by the `template` command.
pub fn format_template_output(keys: &[String], output: &Path) -> Vec<String> {
    let mut lines: Vec<String> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| format!("{} {}", format_index(i + 1), key))
        .collect();
    lines.push(format!("Wrote {} keys \u{2192} {}", keys.len(), output.display()));
    lines
}

pub fn print_template_output(keys: &[String], output: &Path) {
    for line in format_template_output(keys, output) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Degradation;
    use crate::imaging::{CropSkipped, CropSpec, Dimensions};
    use crate::process::AssetCheck;
    use crate::scan::Asset;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn job_header_with_and_without_locale() {
        let source = Path::new("input/screenshots/1.png");
        assert_eq!(job_header(3, source, Some("de")), "003 1.png [de]");
        assert_eq!(job_header(3, source, None), "003 1.png");
    }

    // =========================================================================
    // Process output
    // =========================================================================

    fn finished(status: JobStatus) -> ProcessEvent {
        ProcessEvent::JobFinished {
            index: 1,
            source: PathBuf::from("in/1.png"),
            locale: Some("en".into()),
            output: PathBuf::from("out/en/1_en.png"),
            crop_skipped: None,
            status,
        }
    }

    #[test]
    fn batch_started_lists_locales() {
        let event = ProcessEvent::BatchStarted {
            assets: 2,
            locales: vec!["de".into(), "en".into()],
            jobs: 4,
        };
        assert_eq!(
            format_process_event(&event),
            vec!["Screenshots: 2, locales: de, en \u{2192} 4 jobs"]
        );
    }

    #[test]
    fn batch_started_without_locales() {
        let event = ProcessEvent::BatchStarted {
            assets: 1,
            locales: vec![],
            jobs: 1,
        };
        assert_eq!(
            format_process_event(&event),
            vec!["Screenshots: 1, locales: none \u{2192} 1 jobs"]
        );
    }

    #[test]
    fn composited_job() {
        assert_eq!(
            format_process_event(&finished(JobStatus::Composited)),
            vec!["001 1.png [en]", "    Output: out/en/1_en.png", "    composited"]
        );
    }

    #[test]
    fn degraded_job_lists_each_reason() {
        let status = JobStatus::Degraded(vec![
            Degradation::BackgroundMissing("bg.png".into()),
            Degradation::OverlayMissing("frame.png".into()),
        ]);
        let lines = format_process_event(&finished(status));
        assert_eq!(lines[2], "    degraded: background not found: bg.png");
        assert_eq!(lines[3], "    degraded: overlay not found: frame.png");
    }

    #[test]
    fn failed_job_omits_output() {
        let lines = format_process_event(&finished(JobStatus::Failed("unreadable".into())));
        assert_eq!(lines, vec!["001 1.png [en]", "    failed: unreadable"]);
    }

    #[test]
    fn crop_skip_is_shown() {
        let event = ProcessEvent::JobFinished {
            index: 2,
            source: PathBuf::from("in/2.png"),
            locale: None,
            output: PathBuf::from("out/2.png"),
            crop_skipped: Some(CropSkipped {
                width: 100,
                height: 100,
                spec: CropSpec::new(60, 0, 0, 60),
            }),
            status: JobStatus::Composited,
        };
        let lines = format_process_event(&event);
        assert_eq!(lines[0], "002 2.png");
        assert!(lines[2].starts_with("    crop skipped: invalid crop box for 100x100 image"));
    }

    #[test]
    fn summary_line() {
        let summary = BatchSummary {
            composited: 4,
            degraded: 1,
            failed: 1,
            skipped: 0,
        };
        assert_eq!(
            format_summary(&summary)[1],
            "Processed 6 jobs: 4 composited, 1 degraded, 1 failed, 0 skipped"
        );
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_report() {
        let paths = ProjectPaths {
            config_file: PathBuf::from("p/screenshot-cropper.json"),
            screenshots: PathBuf::from("p/input/screenshots"),
            locales: None,
            output: PathBuf::from("p/output"),
            asset_root: PathBuf::from("p/input"),
            base_dir: PathBuf::from("p"),
        };
        let check = ProjectCheck {
            assets: vec![
                AssetCheck {
                    asset: Asset {
                        path: PathBuf::from("p/input/screenshots/1.png"),
                        stem: "1".into(),
                        number: Some(1),
                    },
                    dimensions: Ok(Dimensions {
                        width: 1170,
                        height: 2532,
                    }),
                },
                AssetCheck {
                    asset: Asset {
                        path: PathBuf::from("p/input/screenshots/cover.png"),
                        stem: "cover".into(),
                        number: None,
                    },
                    dimensions: Err("Decode failed: bad".into()),
                },
            ],
            locales: vec!["de".into(), "en".into()],
            jobs: 4,
        };

        assert_eq!(
            format_check(&check, &paths),
            vec![
                "Config",
                "    p/screenshot-cropper.json",
                "Screenshots (2)",
                "001 1.png 1170x2532",
                "002 cover.png (unreadable: Decode failed: bad)",
                "    Text: by position",
                "Locales (2)",
                "    de, en",
                "Jobs: 4",
            ]
        );
    }

    #[test]
    fn template_output() {
        let keys = vec!["hello".to_string(), "world".to_string()];
        assert_eq!(
            format_template_output(&keys, Path::new("t.json")),
            vec!["001 hello", "002 world", "Wrote 2 keys \u{2192} t.json"]
        );
    }
}
