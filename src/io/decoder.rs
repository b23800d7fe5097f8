//! Audio decoding using Symphonia
//!
//! Decoding sits behind the [`AudioDecoder`] trait so the normalizer can be
//! driven by a stub in tests and by [`SymphoniaDecoder`] everywhere else.

use std::io::Cursor;

use serde::{Deserialize, Serialize};
use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AudioError;
use crate::io::sample_buffer::SampleBuffer;

/// Container hints passed to the prober
///
/// Both fields are optional; Symphonia sniffs the stream either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatHint {
    /// File extension without the dot (`"mp3"`, `"webm"`)
    pub extension: Option<String>,
    /// MIME type (`"audio/webm"`)
    pub mime_type: Option<String>,
}

impl FormatHint {
    /// No hint
    pub fn none() -> Self {
        Self::default()
    }

    /// Hint from a file name's extension
    pub fn from_file_name(name: &str) -> Self {
        let extension = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        Self {
            extension,
            mime_type: None,
        }
    }

    /// Add a MIME type; parameters such as `;codecs=opus` are dropped
    pub fn with_mime_type(mut self, mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        if !essence.is_empty() {
            self.mime_type = Some(essence.to_ascii_lowercase());
        }
        self
    }

    fn to_symphonia(&self) -> Hint {
        let mut hint = Hint::new();
        if let Some(ext) = &self.extension {
            hint.with_extension(ext);
        }
        if let Some(mime) = &self.mime_type {
            hint.mime_type(mime);
        }
        hint
    }
}

/// Basic facts about a decodable input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Native sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: usize,
    /// Samples per channel
    pub frames: usize,
}

impl From<&SampleBuffer> for AudioInfo {
    fn from(buffer: &SampleBuffer) -> Self {
        Self {
            duration_seconds: buffer.duration_seconds(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channel_count(),
            frames: buffer.frames(),
        }
    }
}

/// Anything that can turn encoded audio into planar `f32` samples
pub trait AudioDecoder {
    /// Decode a whole input at its native rate and channel layout
    ///
    /// # Errors
    ///
    /// `DecodingError` if the container or codec is unsupported or the data is corrupt.
    fn decode(&self, input: &[u8], hint: &FormatHint) -> Result<SampleBuffer, AudioError>;
}

/// Decoder backed by Symphonia's default format and codec registries
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

/// Whether a packet read error ends the stream rather than failing it
///
/// A reset (new track list) stops decoding with a warning; the frames read
/// so far are kept.
fn is_end_of_stream(err: &SymphoniaError, frames_read: usize) -> bool {
    match err {
        SymphoniaError::IoError(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
        SymphoniaError::ResetRequired => {
            log::warn!(
                "Stream reset after {} frames; remaining packets ignored",
                frames_read
            );
            true
        }
        _ => false,
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, input: &[u8], hint: &FormatHint) -> Result<SampleBuffer, AudioError> {
        log::debug!("Decoding {} bytes (hint: {:?})", input.len(), hint);

        let mss = MediaSourceStream::new(Box::new(Cursor::new(input.to_vec())), Default::default());

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint.to_symphonia(), mss, &fmt_opts, &meta_opts)
            .map_err(|e| AudioError::DecodingError(format!("Unrecognized container: {}", e)))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::DecodingError("No supported audio tracks found".to_string()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let declared_channels = track.codec_params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodingError(format!("Unsupported codec: {}", e)))?;

        let mut buffer: Option<SampleBuffer> = None;
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(e) if is_end_of_stream(&e, buffer.as_ref().map_or(0, |b| b.frames())) => {
                    break;
                }
                Err(e) => {
                    return Err(AudioError::DecodingError(format!("Failed to read packet: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    // Corrupt packet; keep going
                    log::warn!("Skipping undecodable packet: {}", msg);
                    skipped_packets += 1;
                    continue;
                }
                Err(SymphoniaError::IoError(e)) => {
                    log::warn!("Skipping truncated packet: {}", e);
                    skipped_packets += 1;
                    continue;
                }
                Err(e) => return Err(AudioError::DecodingError(e.to_string())),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            sample_rate = Some(spec.rate);

            if decoded.frames() == 0 {
                continue;
            }

            let mut interleaved = InterleavedBuffer::<f32>::new(decoded.capacity() as u64, spec);
            interleaved.copy_interleaved_ref(decoded);

            match buffer.as_mut() {
                Some(existing) => {
                    if existing.sample_rate() != spec.rate {
                        return Err(AudioError::DecodingError(format!(
                            "Sample rate changed mid-stream: {} -> {}",
                            existing.sample_rate(),
                            spec.rate
                        )));
                    }
                    existing.extend_interleaved(channels, interleaved.samples())?;
                }
                None => {
                    buffer = Some(SampleBuffer::from_interleaved(
                        spec.rate,
                        channels,
                        interleaved.samples(),
                    )?);
                }
            }
        }

        if skipped_packets > 0 {
            log::warn!("Skipped {} corrupt packets", skipped_packets);
        }

        let buffer = match buffer {
            Some(buffer) => buffer,
            None => {
                // Valid container with no audio frames
                let rate = sample_rate
                    .filter(|&r| r > 0)
                    .ok_or_else(|| AudioError::DecodingError("Unknown sample rate".to_string()))?;
                let channels = declared_channels.unwrap_or(1);
                SampleBuffer::new(rate, vec![Vec::new(); channels])?
            }
        };

        log::debug!(
            "Decoded {} frames, {} channels at {} Hz",
            buffer.frames(),
            buffer.channel_count(),
            buffer.sample_rate()
        );

        Ok(buffer)
    }
}
