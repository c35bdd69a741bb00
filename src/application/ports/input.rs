//! Audio input port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::PcmFormat;
use crate::domain::capture::{AudioChunk, InvalidStateTransition};

/// Capture errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Input device not found: {0}")]
    DeviceNotFound(String),

    #[error("Input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to open input stream: {0}")]
    OpenFailed(String),

    #[error("Capture failed: {0}")]
    StreamFailed(String),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Channel on which an input stream delivers chunks, in order
pub type ChunkSender = mpsc::UnboundedSender<AudioChunk>;

/// Port for acquiring exclusive access to an audio input
#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Handle to an acquired input
    type Stream: InputStream;

    /// Acquire the input for capture in `format`.
    ///
    /// # Returns
    /// A stream that is ready but not yet delivering audio, or an error
    /// when the device is missing, busy or access is denied
    async fn acquire(&self, format: PcmFormat) -> Result<Self::Stream, CaptureError>;
}

/// An acquired input device.
///
/// The device stays held until [`InputStream::release`] is called or the
/// stream is dropped. Implementations release on drop as well.
#[async_trait]
pub trait InputStream: Send {
    /// Begin capture. Compressed chunks are sent on `chunks` in delivery
    /// order; sequence numbers start at 0 for every call.
    fn start(&mut self, chunks: ChunkSender) -> Result<(), CaptureError>;

    /// End capture.
    ///
    /// Must not return before the final chunk has been sent and every
    /// clone of the sender handed to `start` has been dropped.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Release the device. Idempotent and infallible.
    fn release(&mut self);
}
