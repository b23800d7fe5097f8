//! Audio normalization pipeline
//!
//! Turns any decodable input into a canonical mono PCM16 WAV at the input's
//! native sample rate:
//!
//! ```text
//! bytes → size gate → decode → downmix → clamp → quantize → WAV
//! ```
//!
//! # Example
//!
//! ```no_run
//! use affect_audio::{AudioNormalizer, FormatHint, NormalizerConfig};
//!
//! let input = std::fs::read("speech.webm")?;
//! let wav = AudioNormalizer::new(NormalizerConfig::default())
//!     .normalize_with_hint(&input, &FormatHint::from_file_name("speech.webm"))?;
//! assert_eq!(wav.len(), 44 + 2 * wav.sample_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Instant;

use crate::config::NormalizerConfig;
use crate::error::AudioError;
use crate::io::decoder::{AudioDecoder, AudioInfo, FormatHint, SymphoniaDecoder};
use crate::io::sample_buffer::SampleBuffer;
use crate::io::wav::WavBytes;
use crate::preprocessing::quantize::clamp_in_place;

/// Reject inputs above `limit` bytes
///
/// # Errors
///
/// `SizeLimitExceeded` when `size > limit`.
pub fn check_size(size: usize, limit: usize) -> Result<(), AudioError> {
    if size > limit {
        return Err(AudioError::SizeLimitExceeded { size, limit });
    }
    Ok(())
}

/// Converts arbitrary audio into canonical mono PCM16 WAV
///
/// Holds no per-call state; one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct AudioNormalizer<D = SymphoniaDecoder> {
    decoder: D,
    config: NormalizerConfig,
}

impl AudioNormalizer<SymphoniaDecoder> {
    /// Symphonia-backed normalizer with the given configuration
    pub fn new(config: NormalizerConfig) -> Self {
        Self::with_decoder(SymphoniaDecoder::new(), config)
    }
}

impl<D: AudioDecoder> AudioNormalizer<D> {
    /// Normalizer using a custom decoder
    pub fn with_decoder(decoder: D, config: NormalizerConfig) -> Self {
        Self { decoder, config }
    }

    /// Active configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize without a container hint
    pub fn normalize(&self, input: &[u8]) -> Result<WavBytes, AudioError> {
        self.normalize_with_hint(input, &FormatHint::none())
    }

    /// Decode, downmix, clamp, quantize and encode `input`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for empty input
    /// - `SizeLimitExceeded` above the configured limit (the decoder is not called)
    /// - `DecodingError` for unsupported or corrupt data
    /// - `UnsupportedChannelLayout` for anything but mono or stereo
    pub fn normalize_with_hint(
        &self,
        input: &[u8],
        hint: &FormatHint,
    ) -> Result<WavBytes, AudioError> {
        let start_time = Instant::now();

        let buffer = self.decode_checked(input, hint)?;
        let sample_rate = buffer.sample_rate();

        let mut mono = buffer.into_mono()?;
        clamp_in_place(&mut mono);
        let wav = WavBytes::encode(sample_rate, &mono)?;

        log::debug!(
            "Normalized {} input bytes to {} WAV bytes ({} samples at {} Hz) in {:.2} ms",
            input.len(),
            wav.len(),
            wav.sample_count(),
            sample_rate,
            start_time.elapsed().as_secs_f32() * 1000.0
        );

        Ok(wav)
    }

    /// Decode `input` and report its duration, rate and layout
    pub fn info(&self, input: &[u8], hint: &FormatHint) -> Result<AudioInfo, AudioError> {
        let buffer = self.decode_checked(input, hint)?;
        Ok(AudioInfo::from(&buffer))
    }

    fn decode_checked(&self, input: &[u8], hint: &FormatHint) -> Result<SampleBuffer, AudioError> {
        log::debug!("Normalizing {} bytes", input.len());

        if input.is_empty() {
            return Err(AudioError::InvalidInput("Empty audio input".to_string()));
        }
        check_size(input.len(), self.config.max_input_bytes)?;

        self.decoder.decode(input, hint)
    }
}

/// Normalize `input` with the default Symphonia decoder and configuration
pub fn normalize_audio(input: &[u8]) -> Result<WavBytes, AudioError> {
    AudioNormalizer::new(NormalizerConfig::default()).normalize(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Returns a fixed buffer and counts calls
    struct StubDecoder {
        buffer: SampleBuffer,
        calls: Cell<usize>,
    }

    impl StubDecoder {
        fn new(buffer: SampleBuffer) -> Self {
            Self {
                buffer,
                calls: Cell::new(0),
            }
        }
    }

    impl AudioDecoder for StubDecoder {
        fn decode(&self, _input: &[u8], _hint: &FormatHint) -> Result<SampleBuffer, AudioError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.buffer.clone())
        }
    }

    struct FailingDecoder;

    impl AudioDecoder for FailingDecoder {
        fn decode(&self, _input: &[u8], _hint: &FormatHint) -> Result<SampleBuffer, AudioError> {
            Err(AudioError::DecodingError("unsupported codec".to_string()))
        }
    }

    #[test]
    fn test_stereo_downmix_and_quantization() {
        let buffer = SampleBuffer::new(
            22050,
            vec![vec![1.0, 1.0, -1.0, 0.8], vec![-1.0, 1.0, -1.0, 0.8]],
        )
        .unwrap();
        let normalizer = AudioNormalizer::with_decoder(StubDecoder::new(buffer), Default::default());

        let wav = normalizer.normalize(b"stub").unwrap();
        assert_eq!(wav.sample_rate(), 22050);
        assert_eq!(wav.len(), 44 + 2 * 4);
        assert_eq!(
            wav.samples().collect::<Vec<_>>(),
            vec![0, 32767, -32768, (0.8f32 * 32767.0).round() as i16]
        );
    }

    #[test]
    fn test_overshoot_clamped() {
        let buffer = SampleBuffer::mono(8000, vec![1.5, -1.2]).unwrap();
        let normalizer = AudioNormalizer::with_decoder(StubDecoder::new(buffer), Default::default());
        let wav = normalizer.normalize(b"stub").unwrap();
        assert_eq!(wav.samples().collect::<Vec<_>>(), vec![32767, -32768]);
    }

    #[test]
    fn test_size_limit_checked_before_decode() {
        let decoder = StubDecoder::new(SampleBuffer::mono(8000, vec![0.0]).unwrap());
        let normalizer =
            AudioNormalizer::with_decoder(decoder, NormalizerConfig { max_input_bytes: 4 });

        let err = normalizer.normalize(&[0u8; 5]).unwrap_err();
        assert_eq!(err, AudioError::SizeLimitExceeded { size: 5, limit: 4 });
        assert_eq!(normalizer.decoder.calls.get(), 0);

        // Exactly at the limit is accepted
        assert!(normalizer.normalize(&[0u8; 4]).is_ok());
        assert_eq!(normalizer.decoder.calls.get(), 1);
    }

    #[test]
    fn test_empty_input_rejected() {
        let normalizer = AudioNormalizer::with_decoder(FailingDecoder, Default::default());
        assert!(matches!(
            normalizer.normalize(&[]),
            Err(AudioError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_decode_error_surfaces() {
        let normalizer = AudioNormalizer::with_decoder(FailingDecoder, Default::default());
        assert!(matches!(
            normalizer.normalize(b"not audio"),
            Err(AudioError::DecodingError(_))
        ));
    }

    #[test]
    fn test_multichannel_rejected() {
        let buffer = SampleBuffer::new(48000, vec![vec![0.1; 8]; 3]).unwrap();
        let normalizer = AudioNormalizer::with_decoder(StubDecoder::new(buffer), Default::default());
        assert_eq!(
            normalizer.normalize(b"stub").unwrap_err(),
            AudioError::UnsupportedChannelLayout(3)
        );
    }

    #[test]
    fn test_info_reports_native_layout() {
        let buffer = SampleBuffer::new(44100, vec![vec![0.0; 44100]; 2]).unwrap();
        let normalizer = AudioNormalizer::with_decoder(StubDecoder::new(buffer), Default::default());
        let info = normalizer.info(b"stub", &FormatHint::none()).unwrap();
        assert_eq!(info.sample_rate, 44100);
        assert_eq!(info.channels, 2);
        assert!((info.duration_seconds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(10, 10).is_ok());
        assert!(check_size(11, 10).is_err());
    }
}
