//! PCM format value object

use std::fmt;

/// Sample rate expected by the speech-to-text endpoint
pub const SPEECH_SAMPLE_RATE: u32 = 16000;

/// Mono capture
pub const SPEECH_CHANNELS: u16 = 1;

/// 16-bit signed PCM
pub const SPEECH_BIT_DEPTH: u16 = 16;

/// Layout of uncompressed PCM audio.
///
/// Only the derived quantities live here; the byte layout of the
/// container is handled by [`super::wav`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
}

impl PcmFormat {
    /// 16 kHz, mono, 16-bit: the format every capture session produces
    pub const SPEECH: Self = Self {
        sample_rate: SPEECH_SAMPLE_RATE,
        channels: SPEECH_CHANNELS,
        bit_depth: SPEECH_BIT_DEPTH,
    };

    /// Bytes used by a single sample of a single channel
    pub const fn bytes_per_sample(&self) -> u16 {
        self.bit_depth / 8
    }

    /// Bytes per sample frame (all channels), `None` if it overflows `u16`
    pub const fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.bytes_per_sample())
    }

    /// Bytes per second of audio, `None` if it overflows `u32`
    pub const fn byte_rate(&self) -> Option<u32> {
        match self.block_align() {
            Some(align) => self.sample_rate.checked_mul(align as u32),
            None => None,
        }
    }

    /// Payload size in bytes for `sample_count` samples
    pub const fn data_size(&self, sample_count: usize) -> usize {
        sample_count * self.bytes_per_sample() as usize
    }

    /// Playback duration of `frames` sample frames, in milliseconds
    pub fn frames_to_millis(&self, frames: usize) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (frames as u64 * 1000) / self.sample_rate as u64
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::SPEECH
    }
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{}ch", n),
        };
        write!(f, "{} Hz {} {}-bit", self.sample_rate, layout, self.bit_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_format_derived_fields() {
        let format = PcmFormat::SPEECH;
        assert_eq!(format.bytes_per_sample(), 2);
        assert_eq!(format.block_align(), Some(2));
        assert_eq!(format.byte_rate(), Some(32000));
    }

    #[test]
    fn data_size_is_two_bytes_per_sample() {
        assert_eq!(PcmFormat::SPEECH.data_size(0), 0);
        assert_eq!(PcmFormat::SPEECH.data_size(16000), 32000);
    }

    #[test]
    fn stereo_block_align() {
        let format = PcmFormat {
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        };
        assert_eq!(format.block_align(), Some(4));
        assert_eq!(format.byte_rate(), Some(176400));
    }

    #[test]
    fn derived_fields_overflow_to_none() {
        let wide = PcmFormat {
            channels: 40000,
            ..PcmFormat::SPEECH
        };
        assert_eq!(wide.block_align(), None);
        assert_eq!(wide.byte_rate(), None);

        let fast = PcmFormat {
            sample_rate: 3_000_000_000,
            ..PcmFormat::SPEECH
        };
        assert_eq!(fast.block_align(), Some(2));
        assert_eq!(fast.byte_rate(), None);
    }

    #[test]
    fn frames_to_millis() {
        assert_eq!(PcmFormat::SPEECH.frames_to_millis(16000), 1000);
        assert_eq!(PcmFormat::SPEECH.frames_to_millis(8000), 500);
    }

    #[test]
    fn display() {
        assert_eq!(PcmFormat::SPEECH.to_string(), "16000 Hz mono 16-bit");
    }

    #[test]
    fn default_is_speech() {
        assert_eq!(PcmFormat::default(), PcmFormat::SPEECH);
    }
}
