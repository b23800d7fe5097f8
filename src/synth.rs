//! Synthetic sine-wave samples
//!
//! Produces a deterministic mono PCM16 WAV without decoding anything. Used as
//! the demo input and as a fixture in tests.

use crate::config::SineConfig;
use crate::error::AudioError;
use crate::io::wav::{WavBytes, MAX_SAMPLE_COUNT};

/// Generate the raw sine samples for `config`
///
/// `floor(duration * rate)` samples, sample `n` being
/// `sin(2π · f · n / rate) · amplitude`.
pub fn sine_samples(config: &SineConfig) -> Result<Vec<f32>, AudioError> {
    if config.sample_rate == 0 {
        return Err(AudioError::InvalidInput("Invalid sample rate".to_string()));
    }
    if !config.duration_secs.is_finite() || config.duration_secs < 0.0 {
        return Err(AudioError::InvalidInput(format!(
            "Invalid duration: {}",
            config.duration_secs
        )));
    }
    if !config.frequency_hz.is_finite() || !config.amplitude.is_finite() {
        return Err(AudioError::InvalidInput(
            "Frequency and amplitude must be finite".to_string(),
        ));
    }

    let rate = f64::from(config.sample_rate);
    let count = (config.duration_secs * rate).floor();
    if count > MAX_SAMPLE_COUNT as f64 {
        return Err(AudioError::InvalidInput(format!(
            "{} s at {} Hz does not fit in a WAV container",
            config.duration_secs, config.sample_rate
        )));
    }
    let count = count as usize;
    let step = 2.0 * std::f64::consts::PI * config.frequency_hz / rate;

    Ok((0..count)
        .map(|n| ((step * n as f64).sin() * config.amplitude) as f32)
        .collect())
}

/// Generate a sine WAV for `config`
pub fn make_sine_wav(config: &SineConfig) -> Result<WavBytes, AudioError> {
    let samples = sine_samples(config)?;
    log::debug!(
        "Generated {} Hz sine: {} samples at {} Hz",
        config.frequency_hz,
        samples.len(),
        config.sample_rate
    );
    WavBytes::encode(config.sample_rate, &samples)
}

/// The one-second 440 Hz, 16 kHz demo sample
pub fn demo_sample() -> Result<WavBytes, AudioError> {
    make_sine_wav(&SineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_sample_size() {
        let wav = demo_sample().unwrap();
        assert_eq!(wav.sample_count(), 16000);
        assert_eq!(wav.len(), 44 + 32000);
        assert_eq!(wav.sample_rate(), 16000);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(demo_sample().unwrap(), demo_sample().unwrap());
    }

    #[test]
    fn test_amplitude_respected() {
        let wav = demo_sample().unwrap();
        let peak = wav.samples().map(|s| (s as i32).abs()).max().unwrap();
        let limit = (0.4 * 32767.0f64).round() as i32;
        assert!(peak <= limit + 1, "peak {} above {}", peak, limit);
        assert!(peak > limit - 50);
        assert_eq!(wav.samples().next(), Some(0));
    }

    #[test]
    fn test_fractional_duration_floors() {
        let config = SineConfig {
            duration_secs: 0.25,
            sample_rate: 8000,
            ..Default::default()
        };
        assert_eq!(sine_samples(&config).unwrap().len(), 2000);

        let config = SineConfig {
            duration_secs: 0.0001,
            sample_rate: 8000,
            ..Default::default()
        };
        assert_eq!(sine_samples(&config).unwrap().len(), 0);
    }

    #[test]
    fn test_duration_not_truncated() {
        // The nearest f32 to 0.7 lies just below it and would floor to 6999
        let config = SineConfig {
            duration_secs: 0.7,
            sample_rate: 10_000,
            ..Default::default()
        };
        assert_eq!(sine_samples(&config).unwrap().len(), 7000);
    }

    #[test]
    fn test_oversized_duration_rejected() {
        let config = SineConfig {
            duration_secs: 1e20,
            sample_rate: 48_000,
            ..Default::default()
        };
        assert!(matches!(
            make_sine_wav(&config),
            Err(AudioError::InvalidInput(_))
        ));

        // One day at 48 kHz exceeds the 4 GiB RIFF limit
        let config = SineConfig {
            duration_secs: 86_400.0,
            sample_rate: 48_000,
            ..Default::default()
        };
        assert!(sine_samples(&config).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = SineConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(make_sine_wav(&config).is_err());

        let config = SineConfig {
            duration_secs: -1.0,
            ..Default::default()
        };
        assert!(make_sine_wav(&config).is_err());
    }
}
