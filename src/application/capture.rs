//! Capture-and-encode use case
//!
//! [`AudioCaptureEncoder`] owns one microphone capture at a time: it
//! acquires the input, buffers the compressed chunks the input delivers,
//! and on stop decodes the whole capture and re-encodes it as a 16 kHz
//! mono 16-bit WAV clip.

use std::mem;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::audio::{EncodedClip, PcmFormat, WavError};
use crate::domain::capture::{AudioChunk, CaptureState, InvalidStateTransition};

use super::ports::{AudioDecoder, AudioInput, CaptureError, DecodeError, InputStream};

/// Why a capture could not be turned into a clip
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizeError {
    #[error("Capture did not stop cleanly: {0}")]
    Capture(#[from] CaptureError),

    #[error("Could not decode the capture: {0}")]
    Decode(#[from] DecodeError),

    #[error("Could not encode WAV: {0}")]
    Encode(#[from] WavError),

    #[error("Encoding task failed: {0}")]
    Task(String),
}

/// Result of [`AudioCaptureEncoder::stop`].
///
/// A clip of silence and a failed capture are different variants, so
/// callers can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The capture was decoded and encoded. May hold zero samples.
    Clip(EncodedClip),
    /// Nothing was captured: no session, no `start`, or no bytes delivered
    NothingRecorded,
    /// Decoding or encoding failed; the device was still released
    Failed(FinalizeError),
}

impl StopOutcome {
    /// Get the clip, if one was produced
    pub fn clip(&self) -> Option<&EncodedClip> {
        match self {
            Self::Clip(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Flatten to a byte blob: the WAV file, or empty when there is none
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Clip(clip) => clip.into_data(),
            Self::NothingRecorded | Self::Failed(_) => Vec::new(),
        }
    }

    /// Convert to a `Result`, keeping "nothing recorded" as `Ok(None)`
    pub fn into_result(self) -> Result<Option<EncodedClip>, FinalizeError> {
        match self {
            Self::Clip(clip) => Ok(Some(clip)),
            Self::NothingRecorded => Ok(None),
            Self::Failed(e) => Err(e),
        }
    }
}

/// Session state together with the resources each state owns
enum Phase<S> {
    Uninitialized,
    Ready {
        stream: S,
    },
    Recording {
        stream: S,
        receiver: mpsc::UnboundedReceiver<AudioChunk>,
        chunks: Vec<AudioChunk>,
    },
    /// Only observable if a `stop` future is dropped before completing
    Finalizing,
}

impl<S> Phase<S> {
    fn state(&self) -> CaptureState {
        match self {
            Self::Uninitialized => CaptureState::Uninitialized,
            Self::Ready { .. } => CaptureState::Ready,
            Self::Recording { .. } => CaptureState::Recording,
            Self::Finalizing => CaptureState::Finalizing,
        }
    }
}

/// Microphone capture session producing one WAV clip per recording
pub struct AudioCaptureEncoder<I, D>
where
    I: AudioInput,
    D: AudioDecoder + 'static,
{
    input: I,
    decoder: Arc<D>,
    format: PcmFormat,
    phase: Phase<I::Stream>,
}

impl<I, D> AudioCaptureEncoder<I, D>
where
    I: AudioInput,
    D: AudioDecoder + 'static,
{
    /// Create an uninitialized session producing 16 kHz mono 16-bit clips
    pub fn new(input: I, decoder: D) -> Self {
        Self {
            input,
            decoder: Arc::new(decoder),
            format: PcmFormat::SPEECH,
            phase: Phase::Uninitialized,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.phase.state()
    }

    /// Format of the clips this session produces
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Acquire the input device.
    ///
    /// Fails with the device error if the input cannot be opened, leaving
    /// the session uninitialized. Fails with `InvalidState` if a device is
    /// already held; the held device is kept.
    pub async fn initialize(&mut self) -> Result<(), CaptureError> {
        self.state().require(CaptureState::Uninitialized, "initialize")?;

        match self.input.acquire(self.format).await {
            Ok(stream) => {
                info!(format = %self.format, "audio input acquired");
                self.phase = Phase::Ready { stream };
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to acquire audio input");
                Err(e)
            }
        }
    }

    /// Begin buffering chunks from the input.
    ///
    /// Without a prior successful `initialize` this does nothing and
    /// reports `InvalidState`.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        match mem::replace(&mut self.phase, Phase::Uninitialized) {
            Phase::Ready { mut stream } => {
                let (sender, receiver) = mpsc::unbounded_channel();
                if let Err(e) = stream.start(sender) {
                    warn!(error = %e, "input stream refused to start");
                    self.phase = Phase::Ready { stream };
                    return Err(e);
                }
                debug!("capture started");
                self.phase = Phase::Recording {
                    stream,
                    receiver,
                    chunks: Vec::new(),
                };
                Ok(())
            }
            other => {
                let current_state = other.state();
                self.phase = other;
                debug!(state = %current_state, "ignoring start");
                Err(InvalidStateTransition {
                    current_state,
                    action: "start capture".to_string(),
                }
                .into())
            }
        }
    }

    /// Move chunks that have already arrived into the buffer.
    ///
    /// Returns the number of chunks buffered so far (0 unless recording).
    pub fn poll_chunks(&mut self) -> usize {
        match &mut self.phase {
            Phase::Recording {
                receiver, chunks, ..
            } => {
                while let Ok(chunk) = receiver.try_recv() {
                    buffer_chunk(chunks, chunk);
                }
                chunks.len()
            }
            _ => 0,
        }
    }

    /// Number of chunks buffered so far
    pub fn chunk_count(&self) -> usize {
        match &self.phase {
            Phase::Recording { chunks, .. } => chunks.len(),
            _ => 0,
        }
    }

    /// Total compressed bytes buffered so far
    pub fn buffered_bytes(&self) -> usize {
        match &self.phase {
            Phase::Recording { chunks, .. } => chunks.iter().map(AudioChunk::len).sum(),
            _ => 0,
        }
    }

    /// End the capture and produce the clip.
    ///
    /// Never fails: decode and encode errors come back as
    /// [`StopOutcome::Failed`]. The device is released and the buffer
    /// cleared on every path, and the session returns to uninitialized.
    pub async fn stop(&mut self) -> StopOutcome {
        match mem::replace(&mut self.phase, Phase::Finalizing) {
            Phase::Recording {
                stream,
                receiver,
                chunks,
            } => {
                let outcome = self.finalize(stream, receiver, chunks).await;
                self.phase = Phase::Uninitialized;
                outcome
            }
            Phase::Ready { mut stream } => {
                debug!("stop called before start");
                stream.release();
                self.phase = Phase::Uninitialized;
                StopOutcome::NothingRecorded
            }
            Phase::Uninitialized | Phase::Finalizing => {
                self.phase = Phase::Uninitialized;
                StopOutcome::NothingRecorded
            }
        }
    }

    /// Release the device and drop buffered chunks.
    ///
    /// Safe from any state and any number of times.
    pub fn cleanup(&mut self) {
        match mem::replace(&mut self.phase, Phase::Uninitialized) {
            Phase::Ready { mut stream } | Phase::Recording { mut stream, .. } => {
                stream.release();
                debug!("audio input released");
            }
            Phase::Uninitialized | Phase::Finalizing => {}
        }
    }

    async fn finalize(
        &self,
        mut stream: I::Stream,
        mut receiver: mpsc::UnboundedReceiver<AudioChunk>,
        mut chunks: Vec<AudioChunk>,
    ) -> StopOutcome {
        let stopped = stream.stop().await;

        // No more sends after this; recv drains what is queued then ends.
        receiver.close();
        while let Some(chunk) = receiver.recv().await {
            buffer_chunk(&mut chunks, chunk);
        }

        stream.release();
        drop(stream);

        if let Err(e) = stopped {
            warn!(error = %e, "input stream failed to stop");
            return StopOutcome::Failed(e.into());
        }

        if chunks.is_empty() {
            info!("no audio captured");
            return StopOutcome::NothingRecorded;
        }

        let encoded = AudioChunk::concat(&chunks);
        debug!(
            chunks = chunks.len(),
            bytes = encoded.len(),
            "capture complete"
        );
        drop(chunks);

        let decoder = Arc::clone(&self.decoder);
        let format = self.format;
        let result =
            tokio::task::spawn_blocking(move || transcode(decoder.as_ref(), &encoded, format))
                .await;

        match result {
            Ok(Ok(clip)) => {
                info!(
                    samples = clip.sample_count(),
                    size = %clip.human_readable_size(),
                    "clip encoded"
                );
                StopOutcome::Clip(clip)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "discarding capture");
                StopOutcome::Failed(e)
            }
            Err(e) => StopOutcome::Failed(FinalizeError::Task(e.to_string())),
        }
    }
}

impl<I, D> Drop for AudioCaptureEncoder<I, D>
where
    I: AudioInput,
    D: AudioDecoder + 'static,
{
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn buffer_chunk(chunks: &mut Vec<AudioChunk>, chunk: AudioChunk) {
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
}

/// Decode a compressed capture and encode its first channel as WAV
fn transcode<D: AudioDecoder + ?Sized>(
    decoder: &D,
    encoded: &[u8],
    format: PcmFormat,
) -> Result<EncodedClip, FinalizeError> {
    let decoded = decoder.decode(encoded, format.sample_rate)?;

    if decoded.sample_rate() != format.sample_rate {
        warn!(
            decoded = decoded.sample_rate(),
            expected = format.sample_rate,
            "decoder returned a different sample rate"
        );
    }
    if decoded.channel_count() > 1 {
        debug!(channels = decoded.channel_count(), "keeping first channel");
    }

    let samples = decoded.into_first_channel();
    Ok(EncodedClip::encode(&samples, format)?)
}
