//! Application layer - Use cases and port interfaces
//!
//! Contains the capture session and the trait definitions
//! for external system interactions.

pub mod capture;
pub mod ports;

pub use capture::{AudioCaptureEncoder, FinalizeError, StopOutcome};
