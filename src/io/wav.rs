//! Canonical mono PCM16 WAV encoding
//!
//! Layout (little-endian):
//!
//! ```text
//! 0  "RIFF"   4  36 + data   8  "WAVE"
//! 12 "fmt "   16 16          20 1 (PCM)   22 1 (mono)
//! 24 rate     28 rate * 2    32 2         34 16
//! 36 "data"   40 data size   44 samples...
//! ```

use crate::error::AudioError;
use crate::preprocessing::quantize::quantize_sample;

/// Size of the canonical header in bytes
pub const WAV_HEADER_LEN: usize = 44;

/// Largest sample count whose data chunk still fits the 32-bit RIFF size
pub const MAX_SAMPLE_COUNT: usize = ((u32::MAX - 36) / 2) as usize;

const PCM_FORMAT_TAG: u16 = 1;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

/// Fields of a canonical mono PCM16 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Size of the `data` chunk in bytes
    pub data_size: u32,
}

impl WavHeader {
    /// Header for `sample_count` mono samples
    pub fn for_samples(sample_rate: u32, sample_count: usize) -> Result<Self, AudioError> {
        let data_size = sample_count
            .checked_mul(2)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| n.checked_add(36).is_some())
            .ok_or_else(|| {
                AudioError::InvalidInput(format!(
                    "{} samples do not fit in a WAV container",
                    sample_count
                ))
            })?;
        Ok(Self {
            sample_rate,
            data_size,
        })
    }

    /// Number of 16-bit samples in the data chunk
    pub fn sample_count(&self) -> usize {
        self.data_size as usize / 2
    }

    /// Serialize to the 44 header bytes
    pub fn to_bytes(&self) -> [u8; WAV_HEADER_LEN] {
        let mut out = [0u8; WAV_HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.data_size.wrapping_add(36).to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&16u32.to_le_bytes());
        out[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        out[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.sample_rate.wrapping_mul(BLOCK_ALIGN as u32).to_le_bytes());
        out[32..34].copy_from_slice(&BLOCK_ALIGN.to_le_bytes());
        out[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        out
    }

    /// Parse and validate a canonical header
    ///
    /// Only the exact layout written by [`WavHeader::to_bytes`] is accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(AudioError::ParseError(format!(
                "WAV header needs {} bytes, got {}",
                WAV_HEADER_LEN,
                bytes.len()
            )));
        }
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(AudioError::ParseError("Missing RIFF/WAVE tags".to_string()));
        }
        if &bytes[12..16] != b"fmt " || u32_at(16) != 16 {
            return Err(AudioError::ParseError("Unexpected fmt chunk".to_string()));
        }
        if u16_at(20) != PCM_FORMAT_TAG
            || u16_at(22) != CHANNELS
            || u16_at(32) != BLOCK_ALIGN
            || u16_at(34) != BITS_PER_SAMPLE
        {
            return Err(AudioError::ParseError(
                "Not a mono 16-bit PCM stream".to_string(),
            ));
        }
        if &bytes[36..40] != b"data" {
            return Err(AudioError::ParseError("Missing data chunk".to_string()));
        }

        let header = Self {
            sample_rate: u32_at(24),
            data_size: u32_at(40),
        };
        if u32_at(4) != header.data_size.wrapping_add(36)
            || u32_at(28) != header.sample_rate.wrapping_mul(BLOCK_ALIGN as u32)
        {
            return Err(AudioError::ParseError(
                "Inconsistent size or byte-rate fields".to_string(),
            ));
        }
        Ok(header)
    }
}

/// An encoded canonical WAV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBytes {
    header: WavHeader,
    bytes: Vec<u8>,
}

impl WavBytes {
    /// Clamp, quantize and encode mono samples
    pub fn encode(sample_rate: u32, samples: &[f32]) -> Result<Self, AudioError> {
        let header = WavHeader::for_samples(sample_rate, samples.len())?;
        let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + header.data_size as usize);
        bytes.extend_from_slice(&header.to_bytes());
        for &s in samples {
            bytes.extend_from_slice(&quantize_sample(s).to_le_bytes());
        }
        Ok(Self { header, bytes })
    }

    /// Validate bytes produced elsewhere
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, AudioError> {
        let header = WavHeader::parse(&bytes)?;
        let expected = WAV_HEADER_LEN + header.data_size as usize;
        if bytes.len() != expected {
            return Err(AudioError::ParseError(format!(
                "Expected {} bytes, got {}",
                expected,
                bytes.len()
            )));
        }
        Ok(Self { header, bytes })
    }

    /// Parsed header
    pub fn header(&self) -> WavHeader {
        self.header
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    /// Number of mono samples
    pub fn sample_count(&self) -> usize {
        self.header.sample_count()
    }

    /// Total length in bytes (`44 + 2 * sample_count`)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the data chunk is empty
    pub fn is_empty(&self) -> bool {
        self.header.data_size == 0
    }

    /// Raw file bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded PCM16 samples
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.bytes[WAV_HEADER_LEN..]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
    }

    /// Consume into the raw file bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for WavBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
