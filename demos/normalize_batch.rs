//! Example: Normalize multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example normalize_batch -- [--jobs N] [--json] [--out DIR] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files. Each file is still normalized on one thread.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use affect_audio::{AudioNormalizer, FormatHint, NormalizerConfig};
use rayon::prelude::*;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

struct ItemOut {
    path: String,
    ok: bool,
    sample_rate: u32,
    samples: usize,
    bytes: usize,
    processing_ms: f64,
    error: Option<String>,
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn output_path(dir: &Path, input: &str) -> PathBuf {
    let stem = Path::new(input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    dir.join(format!("{}.wav", stem))
}

fn process(normalizer: &AudioNormalizer, path: &str, out_dir: Option<&Path>) -> ItemOut {
    let t0 = Instant::now();
    let result = std::fs::read(path)
        .map_err(|e| format!("read failed: {e}"))
        .and_then(|bytes| {
            normalizer
                .normalize_with_hint(&bytes, &FormatHint::from_file_name(path))
                .map_err(|e| format!("normalize failed: {e}"))
        })
        .and_then(|wav| {
            if let Some(dir) = out_dir {
                std::fs::write(output_path(dir, path), wav.as_bytes())
                    .map_err(|e| format!("write failed: {e}"))?;
            }
            Ok(wav)
        });
    let processing_ms = t0.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(wav) => ItemOut {
            path: path.to_string(),
            ok: true,
            sample_rate: wav.sample_rate(),
            samples: wav.sample_count(),
            bytes: wav.len(),
            processing_ms,
            error: None,
        },
        Err(e) => ItemOut {
            path: path.to_string(),
            ok: false,
            sample_rate: 0,
            samples: 0,
            bytes: 0,
            processing_ms,
            error: Some(e),
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--out" => {
                let dir = args.first().ok_or("--out requires a directory")?.clone();
                args.remove(0);
                out_dir = Some(PathBuf::from(dir));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: normalize_batch [--jobs N] [--json] [--out DIR] <file1> <file2> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n\
                     --out DIR  Write normalized WAVs into DIR\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    if let Some(dir) = &out_dir {
        std::fs::create_dir_all(dir)?;
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let normalizer = AudioNormalizer::new(NormalizerConfig::default());

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| process(&normalizer, path, out_dir.as_deref()))
            .collect()
    });

    for (idx, o) in outs.iter().enumerate() {
        if json {
            let line = if o.ok {
                serde_json::json!({
                    "file": o.path,
                    "sample_rate": o.sample_rate,
                    "samples": o.samples,
                    "bytes": o.bytes,
                    "processing_time_ms": o.processing_ms,
                })
            } else {
                serde_json::json!({
                    "file": o.path,
                    "error": o.error.as_deref().unwrap_or("unknown error"),
                })
            };
            println!("{}", line);
        } else if o.ok {
            println!(
                "[{}/{}] {}: {} samples @ {} Hz, {} bytes, time={:.2}ms",
                idx + 1,
                outs.len(),
                o.path,
                o.samples,
                o.sample_rate,
                o.bytes,
                o.processing_ms
            );
        } else {
            println!(
                "[{}/{}] {}: ERROR: {}",
                idx + 1,
                outs.len(),
                o.path,
                o.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let ok = outs.iter().filter(|o| o.ok).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
