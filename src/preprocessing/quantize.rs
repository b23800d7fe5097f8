//! Float to PCM16 conversion
//!
//! Samples are clamped to [-1.0, 1.0] and scaled asymmetrically so the full
//! signed 16-bit range is reachable: positive values by 32767, negative values
//! by 32768.
//!
//! # Example
//!
//! ```
//! use affect_audio::preprocessing::quantize::quantize_sample;
//!
//! assert_eq!(quantize_sample(1.0), 32767);
//! assert_eq!(quantize_sample(-1.0), -32768);
//! assert_eq!(quantize_sample(0.0), 0);
//! ```

/// Positive full-scale factor
pub const POSITIVE_SCALE: f32 = 32767.0;

/// Negative full-scale factor
pub const NEGATIVE_SCALE: f32 = 32768.0;

/// Clamp a sample to [-1.0, 1.0]; NaN becomes silence
#[inline]
pub fn clamp_sample(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    }
}

/// Clamp every sample in place
pub fn clamp_in_place(samples: &mut [f32]) {
    for s in samples.iter_mut() {
        *s = clamp_sample(*s);
    }
}

/// Clamp and quantize one sample to signed 16-bit
///
/// Rounds half away from zero.
#[inline]
pub fn quantize_sample(sample: f32) -> i16 {
    let v = clamp_sample(sample);
    let scaled = if v >= 0.0 {
        v * POSITIVE_SCALE
    } else {
        v * NEGATIVE_SCALE
    };
    // Clamped input keeps `scaled` inside i16 range
    scaled.round() as i16
}

/// Quantize a slice of samples
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| quantize_sample(s)).collect()
}
