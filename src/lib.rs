//! fleet-voice - microphone capture to speech-ready WAV
//!
//! Records the microphone as a compressed stream of chunks, then decodes
//! the whole capture and re-encodes it as a 16 kHz mono 16-bit PCM WAV
//! clip suitable for a speech-to-text service.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: WAV codec, PCM format, chunks, capture states, config
//! - **Application**: The [`AudioCaptureEncoder`](application::AudioCaptureEncoder)
//!   session and its port traits
//! - **Infrastructure**: cpal microphone input, file input, symphonia
//!   decoding, rubato resampling, XDG config file
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
