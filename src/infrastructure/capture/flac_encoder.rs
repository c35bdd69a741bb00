//! FLAC encoding of captured microphone audio
//!
//! The microphone adapter compresses each capture losslessly before
//! handing it out as chunks, so the decode step sees a real container.

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use thiserror::Error;

const BITS_PER_SAMPLE: usize = 16;

const CHANNELS: usize = 1;

/// Encode mono 16-bit PCM samples to a FLAC stream
pub fn encode_to_flac(pcm_samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    if pcm_samples.is_empty() {
        return Err(EncodingError::Empty);
    }

    // flacenc works on i32
    let samples_i32: Vec<i32> = pcm_samples.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Config(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        CHANNELS,
        BITS_PER_SAMPLE,
        sample_rate as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Encode(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Write(e.to_string()))?;

    Ok(sink.into_inner())
}

/// FLAC encoding errors
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("No samples to encode")]
    Empty,

    #[error("FLAC config error: {0}")]
    Config(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),

    #[error("FLAC write failed: {0}")]
    Write(String),
}
