//! Decoder port interface

use thiserror::Error;

use crate::domain::audio::DecodedAudio;

/// Decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("No audio data to decode")]
    Empty,

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No decodable audio track found")]
    NoTrack,

    #[error("Decoding failed: {0}")]
    DecodeFailed(String),

    #[error("Resampling failed: {0}")]
    ResampleFailed(String),
}

/// Port for turning a compressed capture into float samples.
///
/// Decoding is CPU-bound and synchronous; callers run it on a blocking
/// thread.
pub trait AudioDecoder: Send + Sync {
    /// Decode a complete compressed stream.
    ///
    /// # Arguments
    /// * `encoded` - The concatenated capture
    /// * `sample_rate` - Rate the returned audio must be resampled to
    ///
    /// # Returns
    /// Planar float samples at `sample_rate`, or an error
    fn decode(&self, encoded: &[u8], sample_rate: u32) -> Result<DecodedAudio, DecodeError>;
}
