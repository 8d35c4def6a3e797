//! Composition benchmark CLI for snapframe.
//!
//! Frames screenshots with the default configuration and reports timing.
//!
//! Usage:
//!   cargo run --release -- <image.png>            Single image
//!   cargo run --release -- --batch <directory>    Every image in directory → CSV output
//!   cargo run --release -- --batch <dir> --auto   Batch with the auto background

use snapframe_lib::background::BackgroundSpec;
use snapframe_lib::compose::{self, CompositionConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage:");
        eprintln!("  frame-bench <image.png> [--auto]");
        eprintln!("  frame-bench --batch <directory> [--auto]");
        std::process::exit(1);
    }

    let mut config = CompositionConfig::default();
    if args.iter().any(|a| a == "--auto") {
        config.background = BackgroundSpec::Auto;
    }

    if args[1] == "--batch" {
        let Some(dir) = args.get(2) else {
            eprintln!("--batch requires a directory path");
            std::process::exit(1);
        };
        run_batch(Path::new(dir), &config);
    } else {
        run_single(Path::new(&args[1]), &config);
    }
}

#[derive(Debug)]
struct FrameResult {
    source: (u32, u32),
    canvas: (u32, u32),
    output_bytes: usize,
    latency_ms: f64,
}

/// Decodes, composes and encodes one image; decoding is not timed.
fn bench_one(path: &Path, config: &CompositionConfig) -> Result<FrameResult, String> {
    let source = compose::load_source(path).map_err(|e| e.to_string())?;
    let start = Instant::now();
    let composed = compose::compose(&source, config).map_err(|e| e.to_string())?;
    let png = compose::encode_png(&composed).map_err(|e| e.to_string())?;
    Ok(FrameResult {
        source: (source.width(), source.height()),
        canvas: composed.dimensions(),
        output_bytes: png.len(),
        latency_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

fn run_single(path: &Path, config: &CompositionConfig) {
    match bench_one(path, config) {
        Ok(r) => {
            println!(
                "{}x{} → {}x{}, {} bytes",
                r.source.0, r.source.1, r.canvas.0, r.canvas.1, r.output_bytes
            );
            eprintln!("--- Compose + encode: {:.1}ms ---", r.latency_ms);
        }
        Err(e) => {
            eprintln!("Frame failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_batch(dir: &Path, config: &CompositionConfig) {
    if !dir.is_dir() {
        eprintln!("Not a directory: {}", dir.display());
        std::process::exit(1);
    }

    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(read) => read
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.iter().any(|x| ext.eq_ignore_ascii_case(x)))
                    .unwrap_or(false)
            })
            .collect(),
        Err(e) => {
            eprintln!("Failed to read {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    };
    entries.sort();

    if entries.is_empty() {
        eprintln!("No image files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("filename,source_w,source_h,canvas_w,canvas_h,output_bytes,latency_ms");

    let mut latencies: Vec<f64> = Vec::new();
    let mut failures = 0usize;

    for image_path in &entries {
        let filename = image_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match bench_one(image_path, config) {
            Ok(r) => {
                println!(
                    "{},{},{},{},{},{},{:.1}",
                    filename, r.source.0, r.source.1, r.canvas.0, r.canvas.1, r.output_bytes, r.latency_ms
                );
                latencies.push(r.latency_ms);
                std::io::stdout().flush().ok();
            }
            Err(e) => {
                log::warn!("{} failed: {}", filename, e);
                failures += 1;
            }
        }
    }

    if !latencies.is_empty() {
        latencies.sort_by(|a, b| a.total_cmp(b));
        let median = latencies[latencies.len() / 2];
        let p99_idx = ((latencies.len() as f64 * 0.99).ceil() as usize).min(latencies.len() - 1);
        let p99 = latencies[p99_idx];
        let avg: f64 = latencies.iter().sum::<f64>() / latencies.len() as f64;

        eprintln!("\n--- Benchmark Summary ---");
        eprintln!("  Images framed:    {}", latencies.len());
        eprintln!("  Failures:         {}", failures);
        eprintln!("  Median latency:   {:.1}ms", median);
        eprintln!("  Average latency:  {:.1}ms", avg);
        eprintln!("  P99 latency:      {:.1}ms", p99);
    }
}
