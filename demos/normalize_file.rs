//! Example: Normalize a single audio file
//!
//! Usage:
//!   cargo run --example normalize_file -- <input> [output.wav]
//!   cargo run --example normalize_file -- --demo [output.wav]
//!
//! Without an output path only the audio info is printed.

use affect_audio::{demo_sample, AudioNormalizer, FormatHint, NormalizerConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let input = match args.first() {
        Some(path) => path.clone(),
        None => {
            eprintln!("Usage: normalize_file <input|--demo> [output.wav]");
            std::process::exit(2);
        }
    };
    let output = args.get(1);

    let wav = if input == "--demo" {
        demo_sample()?
    } else {
        let bytes = std::fs::read(&input)?;
        let hint = FormatHint::from_file_name(&input);
        let normalizer = AudioNormalizer::new(NormalizerConfig::default());

        let info = normalizer.info(&bytes, &hint)?;
        println!("Input: {}", input);
        println!("  Sample rate: {} Hz", info.sample_rate);
        println!("  Channels: {}", info.channels);
        println!("  Duration: {:.2} s ({} frames)", info.duration_seconds, info.frames);

        normalizer.normalize_with_hint(&bytes, &hint)?
    };

    println!("Output: {} samples at {} Hz, {} bytes", wav.sample_count(), wav.sample_rate(), wav.len());

    if let Some(path) = output {
        std::fs::write(path, wav.as_bytes())?;
        println!("Wrote {}", path);
    }

    Ok(())
}
