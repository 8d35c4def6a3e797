//! Integration tests for the composition pipeline.
//!
//! Exercises layout, preset catalog, masking, auto backgrounds, and the
//! file-level compose path through the public API only.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use snapframe_lib::background::{self, BackgroundSpec};
use snapframe_lib::color::{extract_auto_gradient, DominantColor, Rgb};
use snapframe_lib::compose::{self, bottom_rounded_mask, CompositionConfig, Dimensions, LayoutPlan};
use snapframe_lib::ComposeError;
use std::path::{Path, PathBuf};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("snapframe-it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A screenshot-like image: light body with a dark band and some color.
fn sample_screenshot(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
        if y < h / 5 {
            Rgba([40, 44, 52, 255])
        } else if (x / 16 + y / 16) % 2 == 0 {
            Rgba([236, 239, 244, 255])
        } else {
            Rgba([94, 129, 172, 255])
        }
    }))
}

// ── Layout ──────────────────────────────────────────────────────────

#[test]
fn reference_layout_1000x700() {
    let plan = LayoutPlan::compute(Dimensions::new(1000, 700), &CompositionConfig::default()).unwrap();
    assert_eq!(plan.frame, Dimensions::new(1000, 732));
    assert_eq!(plan.shadow_padding, 80);
    assert_eq!(plan.canvas, Dimensions::new(1240, 972));
    assert_eq!(plan.screenshot_offset.y - plan.frame_offset.y, 32.0);
}

#[test]
fn composed_image_matches_planned_canvas() {
    let source = sample_screenshot(320, 200);
    let config = CompositionConfig::default();
    let plan = LayoutPlan::compute(Dimensions::new(320, 200), &config).unwrap();
    let out = compose::compose(&source, &config).unwrap();
    assert_eq!(out.dimensions(), (plan.canvas.width, plan.canvas.height));
}

// ── Presets ─────────────────────────────────────────────────────────

#[test]
fn preset_listing_is_stable() {
    let first = background::preset_names();
    let second = background::preset_names();
    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert!(!first.contains(&"auto"));
}

#[test]
fn unknown_preset_lists_every_name() {
    let config = CompositionConfig {
        background: BackgroundSpec::Preset { name: "nonexistent".into() },
        ..Default::default()
    };
    let err = compose::compose(&sample_screenshot(20, 20), &config).unwrap_err();
    assert!(matches!(err, ComposeError::UnknownPreset { .. }));
    let message = err.to_string();
    assert!(message.contains("nonexistent"));
    for name in background::preset_names() {
        assert!(message.contains(name), "missing {} in: {}", name, message);
    }
}

#[test]
fn every_preset_composes() {
    let source = sample_screenshot(40, 30);
    for preset in background::available_presets() {
        let config = CompositionConfig {
            background: BackgroundSpec::Preset { name: preset.name.to_string() },
            ..Default::default()
        };
        assert!(compose::compose(&source, &config).is_ok(), "preset {}", preset.name);
    }
}

// ── Masking ─────────────────────────────────────────────────────────

#[test]
fn screenshot_mask_square_top_round_bottom() {
    let mask = bottom_rounded_mask(100, 100, 10.0).unwrap();
    for (x, y) in [(0, 0), (99, 0)] {
        assert_eq!(mask.get_pixel(x, y)[0], 255, "top corner {},{}", x, y);
    }
    for (x, y) in [(0, 99), (99, 99), (1, 97), (97, 98)] {
        assert_eq!(mask.get_pixel(x, y)[0], 0, "bottom arc {},{}", x, y);
    }
}

#[test]
fn screenshot_corners_are_stacked_in_order() {
    let green = Rgba([0, 128, 0, 255]);
    let white = Rgba([250, 250, 250, 255]);
    let config = CompositionConfig {
        background: BackgroundSpec::Gradient { colors: vec![Rgb::new(0, 128, 0)], angle: 0.0 },
        shadow_enabled: false,
        ..Default::default()
    };
    let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 50, white));
    let out = compose::compose(&source, &config).unwrap();

    // Frame at 120, screenshot 50x50 at (120, 152).
    let (left, top, bottom) = (120, 152, 201);
    // Bottom corners are cut from both the panel and the screenshot.
    assert_eq!(*out.get_pixel(left, bottom), green);
    assert_eq!(*out.get_pixel(left + 49, bottom), green);
    // Bottom edge and square top corners show the screenshot over the frame.
    assert_eq!(*out.get_pixel(left + 25, bottom), white);
    assert_eq!(*out.get_pixel(left, top), white);
    assert_eq!(*out.get_pixel(left + 49, top), white);
    // Title bar above the screenshot, clear of the buttons.
    let t = config.theme.title_bar();
    assert_eq!(out.get_pixel(left + 48, top - 16).0, [t.r, t.g, t.b, 255]);
}

// ── Color analysis ──────────────────────────────────────────────────

#[test]
fn solid_color_is_dominant() {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([200, 40, 90, 255])));
    let dominant = DominantColor::analyze(&img).unwrap();
    let c = dominant.color;
    assert!(c.r.abs_diff(200) < 32 && c.g.abs_diff(40) < 32 && c.b.abs_diff(90) < 32);
    assert!(!dominant.is_neutral());
}

#[test]
fn grey_is_neutral_and_yields_grey_gradient() {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([0x80, 0x80, 0x80, 255])));
    assert!(DominantColor::analyze(&img).unwrap().is_neutral());
    let gradient = extract_auto_gradient(&img);
    for c in &gradient.colors {
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }
}

#[test]
fn hsl_round_trip_on_a_coarse_grid() {
    for r in (0..=255u16).step_by(15) {
        for g in (0..=255u16).step_by(15) {
            for b in (0..=255u16).step_by(15) {
                let rgb = Rgb::new(r as u8, g as u8, b as u8);
                let back = rgb.to_hsl().to_rgb();
                assert!(rgb.r.abs_diff(back.r) <= 1 && rgb.g.abs_diff(back.g) <= 1 && rgb.b.abs_diff(back.b) <= 1);
            }
        }
    }
}

// ── End to end ──────────────────────────────────────────────────────

fn digest(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}

#[test]
fn composition_is_byte_identical_across_runs() {
    let source = sample_screenshot(200, 120);
    for background in [BackgroundSpec::Default, BackgroundSpec::Auto] {
        let config = CompositionConfig { background, ..Default::default() };
        let a = compose::compose_to_png_bytes(&source, &config).unwrap();
        let b = compose::compose_to_png_bytes(&source, &config).unwrap();
        assert_eq!(digest(&a), digest(&b));
    }
}

#[test]
fn compose_file_writes_png_and_no_partial() {
    let dir = scratch("file");
    let input = dir.join("shot.png");
    sample_screenshot(120, 80).save(&input).unwrap();

    let output = compose::default_output_path(&input, None, compose::DEFAULT_OUTPUT_SUFFIX);
    let written = compose::compose_file(&input, &output, &CompositionConfig::default()).unwrap();
    assert_eq!(written, dir.join("shot-framed.png"));

    let decoded = image::open(&written).unwrap();
    assert_eq!(decoded.dimensions(), (120 + 240, 80 + 32 + 240));
    let leftovers: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
        .collect();
    assert!(leftovers.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn image_background_is_cover_fitted() {
    let dir = scratch("bgimage");
    let bg_path = dir.join("bg.png");
    RgbaImage::from_pixel(10, 40, Rgba([10, 200, 30, 255])).save(&bg_path).unwrap();

    let config = CompositionConfig {
        background: BackgroundSpec::Image { path: bg_path },
        ..Default::default()
    };
    let out = compose::compose(&sample_screenshot(50, 50), &config).unwrap();
    let corner = out.get_pixel(0, 0);
    assert!(corner[0].abs_diff(10) <= 2 && corner[1].abs_diff(200) <= 2 && corner[2].abs_diff(30) <= 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_background_image_is_io_error() {
    let config = CompositionConfig {
        background: BackgroundSpec::Image { path: Path::new("/no/such/bg.png").into() },
        ..Default::default()
    };
    let err = compose::compose(&sample_screenshot(10, 10), &config).unwrap_err();
    assert!(matches!(err, ComposeError::Io { .. }));
}

#[test]
fn failure_leaves_destination_untouched() {
    let dir = scratch("untouched");
    let input = dir.join("broken.png");
    std::fs::write(&input, b"\x89PNG truncated").unwrap();
    let output = dir.join("broken-framed.png");

    let err = compose::compose_file(&input, &output, &CompositionConfig::default()).unwrap_err();
    assert!(matches!(err, ComposeError::Decode { .. }));
    assert!(!output.exists());
    let _ = std::fs::remove_dir_all(&dir);
}
