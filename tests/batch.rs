//! End-to-end batch runs through the public library API.

use image::{GenericImageView, Rgba, RgbaImage};
use screenshot_cropper::config::load_config;
use screenshot_cropper::paths::ProjectPaths;
use screenshot_cropper::process::{BatchOptions, ProcessEvent, process};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn write_png(path: &Path, image: &RgbaImage) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(path).unwrap();
}

fn write_json(path: &Path, value: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

/// 800x600 screenshot onto a 1242x2208 background, two locales.
fn store_project(root: &Path) {
    write_json(
        &root.join("screenshot-cropper.json"),
        json!({
            "crop": { "top": 50 },
            "background": {
                "file": "background.png",
                "position": { "x": 100, "y": 1200 },
                "size": { "width": 1000, "height": 687 }
            },
            "text": {
                "font": {
                    "files": { "default": "NotInstalled.ttf" },
                    "size": 48,
                    "align": "center",
                    "vertical-align": "top",
                    "x": 50, "y": 50, "width": 1142, "height": 400
                }
            }
        }),
    );
    write_png(
        &root.join("input/background.png"),
        &RgbaImage::from_pixel(1242, 2208, BLUE),
    );
    write_png(
        &root.join("input/screenshots/1.png"),
        &RgbaImage::from_pixel(800, 600, RED),
    );
    write_json(
        &root.join("input/locales/en.json"),
        json!({ "Text_1": "Hello World" }),
    );
    write_json(&root.join("input/locales/fr.json"), json!(["Bonjour", "Salut"]));
}

#[test]
fn directory_mode_renders_each_locale() {
    let tmp = TempDir::new().unwrap();
    store_project(tmp.path());
    let paths = ProjectPaths::from_directory(tmp.path()).unwrap();
    let config = load_config(&paths.config_file).unwrap();

    let summary = process(&paths, &config, &BatchOptions::default(), None).unwrap();

    assert_eq!(summary.failed, 0);
    assert_eq!(summary.total(), 2);
    for out in ["output/en/1_en.png", "output/fr/1_fr.png"] {
        let image = image::open(tmp.path().join(out)).unwrap();
        assert_eq!(image.dimensions(), (1242, 2208));
        let rgba = image.to_rgba8();
        // Foreground is 1000x687 at (100, 1200)
        assert_eq!(rgba.get_pixel(600, 1500)[0], 255);
        assert_eq!(rgba.get_pixel(50, 1500), &BLUE);
        assert_eq!(rgba.get_pixel(600, 1900), &BLUE);
    }
}

#[test]
fn config_mode_uses_directories_section() {
    let tmp = TempDir::new().unwrap();
    write_png(
        &tmp.path().join("shots/home.png"),
        &RgbaImage::from_pixel(40, 30, RED),
    );
    let config_file = tmp.path().join("conf/screenshot-cropper.json");
    write_json(
        &config_file,
        json!({
            "crop": { "left": 10 },
            "export": { "format": "webp" },
            "directories": { "screenshots": "../shots", "output": "../rendered" }
        }),
    );
    let config = load_config(&config_file).unwrap();
    let paths = ProjectPaths::from_config_file(&config_file, &config.directories).unwrap();
    let (tx, rx) = std::sync::mpsc::channel();

    let summary = process(&paths, &config, &BatchOptions::default(), Some(tx)).unwrap();

    assert_eq!(summary.composited, 1);
    let out = image::open(tmp.path().join("conf/../rendered/home.webp")).unwrap();
    assert_eq!(out.dimensions(), (30, 30));
    let events: Vec<ProcessEvent> = rx.iter().collect();
    assert!(matches!(
        events.last(),
        Some(ProcessEvent::JobFinished { locale: None, .. })
    ));
}

#[test]
fn unreadable_screenshot_fails_only_its_jobs() {
    let tmp = TempDir::new().unwrap();
    store_project(tmp.path());
    fs::write(tmp.path().join("input/screenshots/2.png"), b"truncated").unwrap();
    let paths = ProjectPaths::from_directory(tmp.path()).unwrap();
    let config = load_config(&paths.config_file).unwrap();

    let summary = process(&paths, &config, &BatchOptions::default(), None).unwrap();

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.total(), 4);
    assert!(tmp.path().join("output/en/1_en.png").exists());
    assert!(!tmp.path().join("output/en/2_en.png").exists());
}
