//! Audio input adapters
//!
//! The microphone adapter records with cpal and delivers a FLAC stream;
//! the file adapter replays an already-encoded file.

mod cpal_input;
mod file_input;
mod flac_encoder;

pub use cpal_input::{list_input_devices, CpalInput, CpalStream, InputDeviceInfo};
pub use file_input::{FileInput, FileStream};
pub use flac_encoder::{encode_to_flac, EncodingError};
