//! Canonical RIFF/WAVE codec for 16-bit PCM
//!
//! Layout of the 44-byte header (all integers little-endian):
//!
//! | offset | size | field                         |
//! |--------|------|-------------------------------|
//! | 0      | 4    | `RIFF`                        |
//! | 4      | 4    | 36 + data size                |
//! | 8      | 4    | `WAVE`                        |
//! | 12     | 4    | `fmt `                        |
//! | 16     | 4    | 16 (fmt chunk size)           |
//! | 20     | 2    | 1 (linear PCM)                |
//! | 22     | 2    | channels                      |
//! | 24     | 4    | sample rate                   |
//! | 28     | 4    | byte rate                     |
//! | 32     | 2    | block align                   |
//! | 34     | 2    | bit depth                     |
//! | 36     | 4    | `data`                        |
//! | 40     | 4    | data size                     |

use thiserror::Error;

use super::format::PcmFormat;

/// Size of the canonical header
pub const HEADER_LEN: usize = 44;

/// Size of the `fmt ` chunk body for plain PCM
const FMT_CHUNK_SIZE: u32 = 16;

/// WAVE_FORMAT_PCM
const FORMAT_PCM: u16 = 1;

/// Bytes of the RIFF chunk that precede the `data` payload, minus the
/// 8-byte RIFF chunk header itself
const RIFF_OVERHEAD: u32 = (HEADER_LEN - 8) as u32;

/// WAV encoding and parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavError {
    #[error("PCM payload of {0} bytes does not fit in a WAV file")]
    TooLarge(usize),

    #[error("WAV data is {0} bytes, shorter than the 44-byte header")]
    Truncated(usize),

    #[error("Expected '{expected}' tag at offset {offset}")]
    BadTag {
        expected: &'static str,
        offset: usize,
    },

    #[error("Unsupported WAV encoding: format code {format}, {bit_depth}-bit")]
    Unsupported { format: u16, bit_depth: u16 },

    #[error("{chunk} chunk declares {declared} bytes but {actual} are present")]
    SizeMismatch {
        chunk: &'static str,
        declared: u32,
        actual: usize,
    },
}

/// Convert a float sample to signed 16-bit PCM.
///
/// Clamps to [-1, 1] first. Negative values scale by 32768 and the rest by
/// 32767 so both ends of the i16 range are reachable. NaN maps to 0.
pub fn sample_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let s = sample.clamp(-1.0, 1.0);
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    scaled.round() as i16
}

/// Inverse of [`sample_to_i16`]
pub fn i16_to_sample(value: i16) -> f32 {
    if value < 0 {
        value as f32 / 32768.0
    } else {
        value as f32 / 32767.0
    }
}

/// Encode float samples as a complete WAV file.
///
/// `samples` are interleaved when `format.channels > 1`. Only 16-bit
/// output is supported.
pub fn encode(samples: &[f32], format: PcmFormat) -> Result<Vec<u8>, WavError> {
    let unsupported = WavError::Unsupported {
        format: FORMAT_PCM,
        bit_depth: format.bit_depth,
    };
    if format.bit_depth != 16 {
        return Err(unsupported);
    }
    let (Some(byte_rate), Some(block_align)) = (format.byte_rate(), format.block_align()) else {
        return Err(unsupported);
    };

    let data_len = format.data_size(samples.len());
    let data_size = u32::try_from(data_len)
        .ok()
        .filter(|size| size.checked_add(RIFF_OVERHEAD).is_some())
        .ok_or(WavError::TooLarge(data_len))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + data_len);
    write_header(&mut buf, format, byte_rate, block_align, data_size);

    for &sample in samples {
        buf.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }

    debug_assert_eq!(buf.len(), HEADER_LEN + data_len);
    Ok(buf)
}

fn write_header(
    buf: &mut Vec<u8>,
    format: PcmFormat,
    byte_rate: u32,
    block_align: u16,
    data_size: u32,
) {
    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(RIFF_OVERHEAD + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
    buf.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    buf.extend_from_slice(&format.channels.to_le_bytes());
    buf.extend_from_slice(&format.sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&format.bit_depth.to_le_bytes());

    // data sub-chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
}

/// Parsed canonical WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub format: PcmFormat,
    pub riff_size: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Parse and validate the header of a canonical 44-byte-header WAV file.
    ///
    /// The declared RIFF and data sizes must match the length of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
        if bytes.len() < HEADER_LEN {
            return Err(WavError::Truncated(bytes.len()));
        }

        expect_tag(bytes, 0, "RIFF")?;
        expect_tag(bytes, 8, "WAVE")?;
        expect_tag(bytes, 12, "fmt ")?;
        expect_tag(bytes, 36, "data")?;

        let fmt_size = read_u32(bytes, 16);
        if fmt_size != FMT_CHUNK_SIZE {
            return Err(WavError::SizeMismatch {
                chunk: "fmt ",
                declared: fmt_size,
                actual: FMT_CHUNK_SIZE as usize,
            });
        }

        let format_code = read_u16(bytes, 20);
        let bit_depth = read_u16(bytes, 34);
        if format_code != FORMAT_PCM {
            return Err(WavError::Unsupported {
                format: format_code,
                bit_depth,
            });
        }

        let header = Self {
            format: PcmFormat {
                sample_rate: read_u32(bytes, 24),
                channels: read_u16(bytes, 22),
                bit_depth,
            },
            riff_size: read_u32(bytes, 4),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            data_size: read_u32(bytes, 40),
        };

        let payload = bytes.len() - HEADER_LEN;
        if header.data_size as usize != payload {
            return Err(WavError::SizeMismatch {
                chunk: "data",
                declared: header.data_size,
                actual: payload,
            });
        }
        if header.riff_size as usize != bytes.len() - 8 {
            return Err(WavError::SizeMismatch {
                chunk: "RIFF",
                declared: header.riff_size,
                actual: bytes.len() - 8,
            });
        }

        Ok(header)
    }

    /// Total file size implied by the header
    pub fn file_size(&self) -> usize {
        self.riff_size as usize + 8
    }

    /// Number of samples in the payload (all channels)
    pub fn sample_count(&self) -> usize {
        match self.format.bytes_per_sample() {
            0 => 0,
            n => self.data_size as usize / n as usize,
        }
    }

    /// Playback duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let channels = self.format.channels.max(1) as usize;
        self.format.frames_to_millis(self.sample_count() / channels)
    }
}

/// Decode the PCM payload of a 16-bit WAV file back to float samples.
///
/// Uses the inverse of the encoder's scaling, so encoding the result again
/// reproduces the same bytes.
pub fn decode_pcm16(bytes: &[u8]) -> Result<(WavHeader, Vec<f32>), WavError> {
    let header = WavHeader::parse(bytes)?;
    if header.format.bit_depth != 16 {
        return Err(WavError::Unsupported {
            format: FORMAT_PCM,
            bit_depth: header.format.bit_depth,
        });
    }

    let samples = bytes[HEADER_LEN..]
        .chunks_exact(2)
        .map(|pair| i16_to_sample(i16::from_le_bytes([pair[0], pair[1]])))
        .collect();

    Ok((header, samples))
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &'static str) -> Result<(), WavError> {
    if &bytes[offset..offset + 4] == tag.as_bytes() {
        Ok(())
    } else {
        Err(WavError::BadTag {
            expected: tag,
            offset,
        })
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
