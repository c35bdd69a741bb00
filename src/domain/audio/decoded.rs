//! Decoded audio value object

/// Planar floating-point audio produced by a decoder.
///
/// Every channel holds the same number of frames.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Create from planar channel data
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Create single-channel audio
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self::new(sample_rate, vec![samples])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Samples of the first channel (empty if there are no channels)
    pub fn first_channel(&self) -> &[f32] {
        self.channels.first().map_or(&[], Vec::as_slice)
    }

    /// Consume and keep only the first channel
    pub fn into_first_channel(self) -> Vec<f32> {
        self.channels.into_iter().next().unwrap_or_default()
    }
}
