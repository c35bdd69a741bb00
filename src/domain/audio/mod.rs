//! Audio domain module

mod clip;
mod decoded;
mod format;
pub mod wav;

pub use clip::{EncodedClip, WAV_MIME_TYPE};
pub use decoded::DecodedAudio;
pub use format::{PcmFormat, SPEECH_BIT_DEPTH, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
pub use wav::{WavError, WavHeader};
