//! Container and codec decoding using symphonia
//!
//! Accepts anything the enabled symphonia features can probe (FLAC, WAV,
//! Ogg/Vorbis, MP3, AAC/M4A, ...), decodes the first audio track to planar
//! f32 and resamples every channel to the requested rate.

use std::io::{Cursor, ErrorKind};

use symphonia::core::audio::{AudioBuffer, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::application::ports::{AudioDecoder, DecodeError};
use crate::domain::audio::DecodedAudio;
use crate::infrastructure::resample::resample;

/// Decoder for compressed captures and audio files
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    hint: Option<String>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the prober a file extension to try first
    pub fn with_extension_hint(extension: impl Into<String>) -> Self {
        Self {
            hint: Some(extension.into()),
        }
    }

    fn decode_native(&self, encoded: &[u8]) -> Result<(u32, Vec<Vec<f32>>), DecodeError> {
        let cursor = Cursor::new(encoded.to_vec());
        let source = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = &self.hint {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                source,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoTrack)?;
        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

        let mut channels: Vec<Vec<f32>> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(DecodeError::DecodeFailed(e.to_string())),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    warn!(error = msg, "skipping corrupt packet");
                    continue;
                }
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(DecodeError::DecodeFailed(e.to_string())),
            };

            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);

            let mut buffer = AudioBuffer::<f32>::new(decoded.capacity() as u64, spec);
            decoded.convert(&mut buffer);

            let count = spec.channels.count();
            if channels.len() < count {
                let frames = channels.first().map_or(0, Vec::len);
                channels.resize(count, vec![0.0; frames]);
            }
            for (index, channel) in channels.iter_mut().enumerate().take(count) {
                channel.extend_from_slice(buffer.chan(index));
            }
        }

        Ok((sample_rate.unwrap_or(0), channels))
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, encoded: &[u8], sample_rate: u32) -> Result<DecodedAudio, DecodeError> {
        if encoded.is_empty() {
            return Err(DecodeError::Empty);
        }

        let (native_rate, channels) = self.decode_native(encoded)?;
        let frames = channels.first().map_or(0, Vec::len);
        debug!(
            native_rate,
            channels = channels.len(),
            frames,
            "decoded audio"
        );

        if frames == 0 {
            return Ok(DecodedAudio::mono(sample_rate, Vec::new()));
        }
        if native_rate == 0 {
            return Err(DecodeError::DecodeFailed(
                "stream does not declare a sample rate".to_string(),
            ));
        }

        let channels = channels
            .iter()
            .map(|channel| resample(channel, native_rate, sample_rate))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DecodeError::ResampleFailed(e.to_string()))?;

        Ok(DecodedAudio::new(sample_rate, channels))
    }
}
