//! Integration tests for the audio normalizer

use std::io::Cursor;

use affect_audio::{
    demo_sample, normalize_audio, AudioError, AudioNormalizer, FormatHint, NormalizerConfig,
};

/// Encode interleaved samples as a WAV file in memory
fn write_wav_i16(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

fn write_wav_f32(samples: &[f32], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Read a normalized WAV back as (samples, spec)
fn read_wav(bytes: &[u8]) -> (Vec<i16>, hound::WavSpec) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes.to_vec())).expect("wav reader");
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("read samples");
    (samples, spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_round_trip() {
        let input: Vec<i16> = (0..2205).map(|i| ((i * 37) % 20000 - 10000) as i16).collect();
        let bytes = write_wav_i16(&input, 1, 22050);

        let wav = normalize_audio(&bytes).expect("normalize should succeed");
        assert_eq!(wav.len(), 44 + 2 * input.len());

        let (output, spec) = read_wav(wav.as_bytes());
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(output.len(), input.len());

        for (i, (&a, &b)) in input.iter().zip(&output).enumerate() {
            assert!(
                (a as i32 - b as i32).abs() <= 1,
                "sample {} drifted: {} -> {}",
                i,
                a,
                b
            );
        }
    }

    #[test]
    fn test_stereo_downmix() {
        // Frames: (1.0, -1.0), (0.5, 0.25), (-1.0, -1.0)
        let interleaved = [1.0f32, -1.0, 0.5, 0.25, -1.0, -1.0];
        let bytes = write_wav_f32(&interleaved, 2, 48000);

        let wav = AudioNormalizer::new(NormalizerConfig::default())
            .normalize_with_hint(&bytes, &FormatHint::from_file_name("take.wav"))
            .expect("normalize should succeed");

        let (output, spec) = read_wav(wav.as_bytes());
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(output, vec![0, 12288, -32768]);
    }

    #[test]
    fn test_float_overshoot_clamped() {
        let bytes = write_wav_f32(&[1.5, -2.0, 0.0], 1, 16000);
        let wav = normalize_audio(&bytes).unwrap();
        let (output, _) = read_wav(wav.as_bytes());
        assert_eq!(output, vec![32767, -32768, 0]);
    }

    #[test]
    fn test_multichannel_rejected() {
        let bytes = write_wav_i16(&[0; 30], 3, 44100);
        assert_eq!(
            normalize_audio(&bytes).unwrap_err(),
            AudioError::UnsupportedChannelLayout(3)
        );
    }

    #[test]
    fn test_size_limit() {
        let bytes = write_wav_i16(&[0; 1000], 1, 8000);
        let normalizer = AudioNormalizer::new(NormalizerConfig {
            max_input_bytes: bytes.len() - 1,
        });
        assert!(matches!(
            normalizer.normalize(&bytes),
            Err(AudioError::SizeLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_corrupt_input() {
        let garbage: Vec<u8> = (0..4096u32).map(|i| (i * 7919 % 251) as u8).collect();
        assert!(matches!(
            normalize_audio(&garbage),
            Err(AudioError::DecodingError(_))
        ));
    }

    #[test]
    fn test_demo_sample_decodes() {
        let wav = demo_sample().unwrap();
        assert_eq!(wav.len(), 44 + 32000);

        let (samples, spec) = read_wav(wav.as_bytes());
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(samples.len(), 16000);

        // Re-normalizing a canonical file keeps length and rate
        let again = normalize_audio(wav.as_bytes()).unwrap();
        assert_eq!(again.len(), wav.len());
        assert_eq!(again.sample_rate(), 16000);
    }

    #[test]
    fn test_info() {
        let bytes = write_wav_i16(&vec![0; 48000 * 2], 2, 48000);
        let info = AudioNormalizer::new(NormalizerConfig::default())
            .info(&bytes, &FormatHint::none())
            .unwrap();
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.channels, 2);
        assert_eq!(info.frames, 48000);
        assert!((info.duration_seconds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_concurrent_calls_independent() {
        let normalizer = &AudioNormalizer::new(NormalizerConfig::default());
        let inputs: Vec<Vec<u8>> = (1..=4)
            .map(|n| write_wav_i16(&vec![100 * n as i16; 800 * n], 1, 8000 * n as u32))
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|bytes| scope.spawn(move || normalizer.normalize(bytes)))
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                let n = i + 1;
                let wav = handle.join().unwrap().unwrap();
                assert_eq!(wav.sample_rate(), 8000 * n as u32);
                assert_eq!(wav.sample_count(), 800 * n);
            }
        });
    }
}
