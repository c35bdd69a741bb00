//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: cpal microphone
//! capture, symphonia decoding and the XDG config file.

pub mod capture;
pub mod config;
pub mod decoding;
pub mod resample;

pub use capture::{list_input_devices, CpalInput, FileInput, InputDeviceInfo};
pub use config::XdgConfigStore;
pub use decoding::SymphoniaDecoder;
