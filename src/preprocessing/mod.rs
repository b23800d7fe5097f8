//! Audio preprocessing modules
//!
//! This module contains utilities for preparing decoded audio for encoding:
//! - Channel mixing (stereo to mono)
//! - Clamping and PCM16 quantization

pub mod channel_mixer;
pub mod quantize;
