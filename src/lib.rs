//! # affect-audio
//!
//! Client-side audio preparation for a multi-modal emotion recognition
//! service: any decodable recording or upload is turned into the canonical
//! mono 16-bit PCM WAV the inference backend expects.
//!
//! ## Features
//!
//! - **Normalization**: Symphonia decoding, stereo downmix, clamping, PCM16 quantization
//! - **WAV encoding**: byte-exact 44-byte canonical header
//! - **Demo samples**: deterministic sine-wave WAVs
//! - **Backend contract**: endpoints, upload parts and response models
//! - **Realtime helpers**: frame supersede gate and exclusive device leases
//!
//! ## Quick Start
//!
//! ```no_run
//! use affect_audio::{normalize_audio, AudioError};
//!
//! let input = std::fs::read("voice_note.m4a").map_err(|e| AudioError::InvalidInput(e.to_string()))?;
//! let wav = normalize_audio(&input)?;
//!
//! println!("{} samples at {} Hz ({} bytes)", wav.sample_count(), wav.sample_rate(), wav.len());
//! # Ok::<(), affect_audio::AudioError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Input bytes → Size gate → Decode → Downmix → Clamp → Quantize → WAV bytes
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod io;
pub mod normalizer;
pub mod preprocessing;
pub mod realtime;
pub mod synth;

// Re-export main types
pub use config::{ApiConfig, NormalizerConfig, SineConfig};
pub use error::AudioError;
pub use io::decoder::{AudioDecoder, AudioInfo, FormatHint, SymphoniaDecoder};
pub use io::sample_buffer::SampleBuffer;
pub use io::wav::{WavBytes, WavHeader, WAV_HEADER_LEN};
pub use normalizer::{normalize_audio, AudioNormalizer};
pub use synth::{demo_sample, make_sine_wav};
