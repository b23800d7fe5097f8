//! Decoded audio held as one sample vector per channel

use crate::error::AudioError;
use crate::preprocessing::channel_mixer::stereo_to_mono;

/// Decoded PCM audio: a sample rate and one `f32` vector per channel
///
/// All channels have the same length. Samples are nominally in [-1.0, 1.0],
/// although decoders may overshoot slightly.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Create a buffer from planar channel data
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the sample rate is zero or channel lengths differ.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidInput("Invalid sample rate".to_string()));
        }
        if let Some(first) = channels.first() {
            let frames = first.len();
            if channels.iter().any(|c| c.len() != frames) {
                return Err(AudioError::InvalidInput(
                    "Channel lengths differ".to_string(),
                ));
            }
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Single-channel buffer
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, AudioError> {
        Self::new(sample_rate, vec![samples])
    }

    /// Build from interleaved samples (`L R L R ...` for stereo)
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        interleaved: &[f32],
    ) -> Result<Self, AudioError> {
        if channel_count == 0 {
            return Err(AudioError::UnsupportedChannelLayout(0));
        }
        if interleaved.len() % channel_count != 0 {
            return Err(AudioError::InvalidInput(format!(
                "{} interleaved samples do not divide into {} channels",
                interleaved.len(),
                channel_count
            )));
        }
        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Append an interleaved chunk with the same channel layout
    pub(crate) fn extend_interleaved(
        &mut self,
        channel_count: usize,
        interleaved: &[f32],
    ) -> Result<(), AudioError> {
        if channel_count != self.channels.len() {
            return Err(AudioError::DecodingError(format!(
                "Channel count changed mid-stream: {} -> {}",
                self.channels.len(),
                channel_count
            )));
        }
        if channel_count == 0 || interleaved.len() % channel_count != 0 {
            return Err(AudioError::DecodingError(
                "Partial frame in decoded chunk".to_string(),
            ));
        }
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in self.channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Ok(())
    }

    /// Consume the buffer and return mono samples
    ///
    /// Stereo is averaged into the left channel's allocation; mono passes
    /// through untouched.
    ///
    /// # Errors
    ///
    /// `UnsupportedChannelLayout` for zero or more than two channels.
    pub fn into_mono(self) -> Result<Vec<f32>, AudioError> {
        let count = self.channels.len();
        let mut channels = self.channels.into_iter();
        match (count, channels.next(), channels.next()) {
            (1, Some(mono), None) => Ok(mono),
            (2, Some(mut left), Some(right)) => {
                stereo_to_mono(&mut left, &right)?;
                Ok(left)
            }
            _ => Err(AudioError::UnsupportedChannelLayout(count)),
        }
    }
}
