//! Encoded clip value object

use super::format::PcmFormat;
use super::wav::{self, WavError, HEADER_LEN};

/// MIME type of every clip
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// A complete WAV file produced by one capture session.
/// Immutable once built; the caller owns the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedClip {
    data: Vec<u8>,
    format: PcmFormat,
}

impl EncodedClip {
    /// Encode float samples into a clip
    pub fn encode(samples: &[f32], format: PcmFormat) -> Result<Self, WavError> {
        let data = wav::encode(samples, format)?;
        Ok(Self { data, format })
    }

    /// Get the raw WAV bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw WAV bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Number of PCM samples in the payload
    pub fn sample_count(&self) -> usize {
        (self.data.len() - HEADER_LEN) / self.format.bytes_per_sample() as usize
    }

    /// Whether the clip carries no samples (header only)
    pub fn is_silent(&self) -> bool {
        self.data.len() == HEADER_LEN
    }

    /// Playback duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let channels = self.format.channels.max(1) as usize;
        self.format.frames_to_millis(self.sample_count() / channels)
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
