//! Domain layer - Core business logic
//!
//! Contains value objects, the WAV codec, capture states and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod recording;

// Re-export common types
pub use audio::{DecodedAudio, EncodedClip, PcmFormat, WavError, WavHeader};
pub use capture::{AudioChunk, CaptureState, InvalidStateTransition};
pub use config::AppConfig;
pub use error::*;
pub use recording::Duration;
