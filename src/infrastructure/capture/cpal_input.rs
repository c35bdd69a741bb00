//! Microphone input using cpal
//!
//! `cpal::Stream` is not `Send`, so each acquired device lives on its own
//! capture thread. The [`CpalStream`] handle drives that thread over a
//! command channel. Audio is buffered as mono float samples while
//! capturing; on stop it is resampled, FLAC-encoded and delivered as
//! chunks, like a media recorder without a timeslice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex as StdMutex};
use std::thread;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, SampleFormat, SampleRate, StreamConfig};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::flac_encoder::encode_to_flac;
use crate::application::ports::{AudioInput, CaptureError, ChunkSender, InputStream};
use crate::domain::audio::wav::{i16_to_sample, sample_to_i16};
use crate::domain::audio::PcmFormat;
use crate::domain::capture::AudioChunk;
use crate::domain::config::DEFAULT_CHUNK_SIZE;
use crate::infrastructure::resample::resample;

/// An input device as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// List the host's input devices
pub fn list_input_devices() -> Result<Vec<InputDeviceInfo>, CaptureError> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

    Ok(devices
        .filter_map(|device| device.name().ok())
        .map(|name| InputDeviceInfo {
            is_default: default_name.as_deref() == Some(name.as_str()),
            name,
        })
        .collect())
}

/// Audio input backed by a cpal capture device
#[derive(Debug, Clone)]
pub struct CpalInput {
    /// Device to open; the host default when `None`
    device_name: Option<String>,
    chunk_size: usize,
}

impl CpalInput {
    /// Use the host's default input device
    pub fn new() -> Self {
        Self {
            device_name: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use the input device with this exact name
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Set the maximum size of a delivered chunk
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    fn get_input_device(name: Option<&str>) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        let Some(name) = name else {
            return host.default_input_device().ok_or(CaptureError::NoAudioDevice);
        };

        host.input_devices()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?
            .find(|device| device.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| CaptureError::DeviceNotFound(name.to_string()))
    }

    /// Pick an i16 or f32 config, preferring fewer channels and one that
    /// can run at `target_rate` directly
    fn get_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        let includes_target = |range: &cpal::SupportedStreamConfigRange| {
            range.min_sample_rate().0 <= target_rate && range.max_sample_rate().0 >= target_rate
        };

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for range in supported_configs {
            if !matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32) {
                continue;
            }

            let is_better = match &best {
                None => true,
                Some(current) => {
                    range.channels() < current.channels()
                        || (includes_target(&range) && !includes_target(current))
                }
            };
            if is_better {
                best = Some(range);
            }
        }

        let range = best.ok_or_else(|| {
            CaptureError::OpenFailed("no i16 or f32 input configuration".to_string())
        })?;

        let sample_rate = if includes_target(&range) {
            SampleRate(target_rate)
        } else {
            range.max_sample_rate()
        };

        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, range.sample_format()))
    }
}

impl Default for CpalInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioInput for CpalInput {
    type Stream = CpalStream;

    async fn acquire(&self, format: PcmFormat) -> Result<CpalStream, CaptureError> {
        let (commands, command_rx) = std_mpsc::channel();
        let (opened_tx, opened_rx) = oneshot::channel();

        let device_name = self.device_name.clone();
        let chunk_size = self.chunk_size;

        thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                capture_thread(device_name, format, chunk_size, opened_tx, command_rx)
            })
            .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

        opened_rx.await.map_err(|_| {
            CaptureError::OpenFailed("capture thread exited during setup".to_string())
        })??;

        Ok(CpalStream {
            commands: Some(commands),
        })
    }
}

enum Command {
    Start(ChunkSender),
    Stop(oneshot::Sender<Result<(), CaptureError>>),
    Release,
}

/// Handle to a device held by a capture thread
pub struct CpalStream {
    commands: Option<std_mpsc::Sender<Command>>,
}

impl CpalStream {
    fn send(&self, command: Command) -> Result<(), CaptureError> {
        self.commands
            .as_ref()
            .ok_or_else(|| CaptureError::DeviceUnavailable("input already released".to_string()))?
            .send(command)
            .map_err(|_| CaptureError::StreamFailed("capture thread exited".to_string()))
    }
}

#[async_trait]
impl InputStream for CpalStream {
    fn start(&mut self, chunks: ChunkSender) -> Result<(), CaptureError> {
        self.send(Command::Start(chunks))
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Stop(reply_tx))?;
        reply_rx
            .await
            .map_err(|_| CaptureError::StreamFailed("capture thread exited".to_string()))?
    }

    fn release(&mut self) {
        if let Some(commands) = self.commands.take() {
            // The thread also exits when the channel disconnects
            let _ = commands.send(Command::Release);
        }
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Body of the capture thread. Owns the cpal stream until released.
fn capture_thread(
    device_name: Option<String>,
    format: PcmFormat,
    chunk_size: usize,
    opened: oneshot::Sender<Result<(), CaptureError>>,
    commands: std_mpsc::Receiver<Command>,
) {
    let buffer = Arc::new(StdMutex::new(Vec::<f32>::new()));
    let capturing = Arc::new(AtomicBool::new(false));

    let (stream, device_rate) =
        match open_stream(device_name.as_deref(), format, &buffer, &capturing) {
            Ok(opened) => opened,
            Err(e) => {
                let _ = opened.send(Err(e));
                return;
            }
        };
    if opened.send(Ok(())).is_err() {
        return;
    }

    let mut sender: Option<ChunkSender> = None;
    let mut play_error: Option<CaptureError> = None;

    while let Ok(command) = commands.recv() {
        match command {
            Command::Start(chunks) => {
                if let Ok(mut samples) = buffer.lock() {
                    samples.clear();
                }
                capturing.store(true, Ordering::SeqCst);
                play_error = stream
                    .play()
                    .err()
                    .map(|e| CaptureError::StreamFailed(e.to_string()));
                sender = Some(chunks);
                debug!(device_rate, "capture thread recording");
            }
            Command::Stop(reply) => {
                capturing.store(false, Ordering::SeqCst);
                let _ = stream.pause();

                let samples = match buffer.lock() {
                    Ok(mut samples) => std::mem::take(&mut *samples),
                    Err(_) => Vec::new(),
                };

                let result = match (play_error.take(), sender.take()) {
                    (Some(e), _) => Err(e),
                    (None, Some(chunks)) => encode_capture(&samples, device_rate, format, chunk_size)
                        .map(|encoded| {
                            for chunk in encoded {
                                let _ = chunks.send(chunk);
                            }
                        }),
                    (None, None) => Ok(()),
                };
                let _ = reply.send(result);
            }
            Command::Release => break,
        }
    }

    drop(stream);
    debug!("capture thread released device");
}

fn open_stream(
    device_name: Option<&str>,
    format: PcmFormat,
    buffer: &Arc<StdMutex<Vec<f32>>>,
    capturing: &Arc<AtomicBool>,
) -> Result<(cpal::Stream, u32), CaptureError> {
    let device = CpalInput::get_input_device(device_name)?;
    let (config, sample_format) = CpalInput::get_input_config(&device, format.sample_rate)?;
    let channels = config.channels;
    let device_rate = config.sample_rate.0;

    info!(
        device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
        rate = device_rate,
        channels,
        "opening input device"
    );

    let on_error = |err: cpal::StreamError| warn!(error = %err, "audio stream error");

    let stream = match sample_format {
        SampleFormat::I16 => {
            let buffer = Arc::clone(buffer);
            let capturing = Arc::clone(capturing);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if capturing.load(Ordering::SeqCst) {
                        let floats: Vec<f32> = data.iter().map(|&s| i16_to_sample(s)).collect();
                        if let Ok(mut samples) = buffer.lock() {
                            samples.extend(mix_to_mono(&floats, channels));
                        }
                    }
                },
                on_error,
                None,
            )
        }
        SampleFormat::F32 => {
            let buffer = Arc::clone(buffer);
            let capturing = Arc::clone(capturing);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if capturing.load(Ordering::SeqCst) {
                        if let Ok(mut samples) = buffer.lock() {
                            samples.extend(mix_to_mono(data, channels));
                        }
                    }
                },
                on_error,
                None,
            )
        }
        other => {
            return Err(CaptureError::OpenFailed(format!(
                "unsupported sample format {:?}",
                other
            )))
        }
    }
    .map_err(|e| match e {
        BuildStreamError::DeviceNotAvailable => {
            CaptureError::DeviceUnavailable("device is no longer available".to_string())
        }
        other => CaptureError::OpenFailed(other.to_string()),
    })?;

    // Some hosts start streams on creation
    let _ = stream.pause();

    Ok((stream, device_rate))
}

/// Average interleaved frames down to one channel
fn mix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Turn a finished capture into FLAC chunks at the target format
fn encode_capture(
    samples: &[f32],
    device_rate: u32,
    format: PcmFormat,
    chunk_size: usize,
) -> Result<Vec<AudioChunk>, CaptureError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let resampled = resample(samples, device_rate, format.sample_rate)
        .map_err(|e| CaptureError::StreamFailed(e.to_string()))?;
    let pcm: Vec<i16> = resampled.iter().map(|&s| sample_to_i16(s)).collect();
    let flac = encode_to_flac(&pcm, format.sample_rate)
        .map_err(|e| CaptureError::StreamFailed(e.to_string()))?;

    debug!(
        samples = pcm.len(),
        bytes = flac.len(),
        "capture compressed"
    );

    Ok(AudioChunk::split(&flac, chunk_size))
}
