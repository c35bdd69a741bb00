//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod decoder;
pub mod input;

// Re-export common types
pub use config::ConfigStore;
pub use decoder::{AudioDecoder, DecodeError};
pub use input::{AudioInput, CaptureError, ChunkSender, InputStream};
