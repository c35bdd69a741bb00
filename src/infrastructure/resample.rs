//! Sample-rate conversion using rubato

use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

/// Input frames handed to the resampler per call
const CHUNK_FRAMES: usize = 1024;

/// Resampling errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ResampleError(String);

/// Resample one channel of float samples from `from` Hz to `to` Hz.
///
/// The output has `len * to / from` frames (rounded), with the
/// resampler's delay trimmed from the front.
pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>, ResampleError> {
    if from == 0 || to == 0 {
        return Err(ResampleError(format!(
            "invalid sample rate conversion {} -> {}",
            from, to
        )));
    }
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let expected = (samples.len() as f64 * to as f64 / from as f64).round() as usize;

    let mut resampler = FftFixedIn::<f32>::new(from as usize, to as usize, CHUNK_FRAMES, 2, 1)
        .map_err(|e| ResampleError(format!("resampler init failed: {}", e)))?;
    let delay = resampler.output_delay();

    let mut output = Vec::with_capacity(expected + delay);
    let mut pos = 0;

    // Keep feeding (zero-padded past the end) until the delayed tail is out
    while output.len() < expected + delay {
        let needed = resampler.input_frames_next();
        let end = (pos + needed).min(samples.len());
        let mut block = samples[pos..end].to_vec();
        block.resize(needed, 0.0);

        let resampled = resampler
            .process(&[block], None)
            .map_err(|e| ResampleError(format!("resampling failed: {}", e)))?;
        output.extend_from_slice(&resampled[0]);
        pos = end;
    }

    Ok(output.into_iter().skip(delay).take(expected).collect())
}
