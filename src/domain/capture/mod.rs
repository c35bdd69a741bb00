//! Capture session domain module

mod chunk;
mod state;

pub use chunk::AudioChunk;
pub use state::{CaptureState, InvalidStateTransition};
