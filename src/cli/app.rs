//! Command runners

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tokio::fs;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{debug, info};

use crate::application::ports::{AudioDecoder, AudioInput, ConfigStore};
use crate::application::{AudioCaptureEncoder, StopOutcome};
use crate::domain::audio::{EncodedClip, WavHeader};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    list_input_devices, CpalInput, FileInput, SymphoniaDecoder, XdgConfigStore,
};

use super::args::{EncodeOptions, RecordOptions};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the `device` key
pub const ENV_DEVICE: &str = "FLEET_VOICE_DEVICE";
/// Environment variable overriding the `log_level` key
pub const ENV_LOG: &str = "FLEET_VOICE_LOG";

const PROGRESS_TICK_MS: u64 = 100;

/// Record from the microphone until the duration elapses or Ctrl+C
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let input = match &options.device {
        Some(name) => CpalInput::with_device(name.clone()),
        None => CpalInput::new(),
    }
    .chunk_size(options.chunk_size);
    let decoder = SymphoniaDecoder::with_extension_hint("flac");
    let mut session = AudioCaptureEncoder::new(input, decoder);

    if let Err(e) = begin(&mut session).await {
        presenter.error(&e);
        return ExitCode::from(EXIT_ERROR);
    }

    let total_ms = options.duration.as_millis();
    presenter.start_spinner("Recording...");
    info!(duration = %options.duration, "recording");

    let started = Instant::now();
    let mut ticker = interval(TokioDuration::from_millis(PROGRESS_TICK_MS));
    loop {
        ticker.tick().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if shutdown.is_shutdown() {
            presenter.update_spinner("Interrupted, finishing clip...");
            debug!(elapsed_ms, "recording interrupted");
            break;
        }
        if elapsed_ms >= total_ms {
            break;
        }

        session.poll_chunks();
        presenter.update_recording_progress(elapsed_ms, total_ms);
    }

    presenter.update_spinner("Encoding...");
    let outcome = session.stop().await;
    save_outcome(outcome, &options.output, &mut presenter).await
}

/// Transcode a file through the same capture pipeline
pub async fn run_encode(options: EncodeOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let input = FileInput::new(&options.input).chunk_size(options.chunk_size);
    let decoder = match options.input.extension().and_then(|e| e.to_str()) {
        Some(extension) => SymphoniaDecoder::with_extension_hint(extension),
        None => SymphoniaDecoder::new(),
    };
    let mut session = AudioCaptureEncoder::new(input, decoder);

    if let Err(e) = begin(&mut session).await {
        presenter.error(&e);
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner(&format!("Encoding {}...", options.input.display()));
    let chunks = session.poll_chunks();
    debug!(chunks, bytes = session.buffered_bytes(), "input buffered");

    let outcome = session.stop().await;
    save_outcome(outcome, &options.output, &mut presenter).await
}

/// Print the header of a WAV file
pub async fn run_inspect(path: &Path) -> ExitCode {
    let presenter = Presenter::new();

    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            presenter.error(&format!("Failed to read {}: {}", path.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let header = match WavHeader::parse(&bytes) {
        Ok(header) => header,
        Err(e) => {
            presenter.error(&format!("{}: {}", path.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.key_value("format", &header.format.to_string());
    presenter.key_value("sample_rate", &header.format.sample_rate.to_string());
    presenter.key_value("channels", &header.format.channels.to_string());
    presenter.key_value("bit_depth", &header.format.bit_depth.to_string());
    presenter.key_value("byte_rate", &header.byte_rate.to_string());
    presenter.key_value("block_align", &header.block_align.to_string());
    presenter.key_value("data_size", &header.data_size.to_string());
    presenter.key_value("file_size", &header.file_size().to_string());
    presenter.key_value("samples", &header.sample_count().to_string());
    presenter.key_value("duration", &format_millis(header.duration_ms()));

    ExitCode::from(EXIT_SUCCESS)
}

/// List capture devices
pub fn run_devices() -> ExitCode {
    let presenter = Presenter::new();

    match list_input_devices() {
        Ok(devices) if devices.is_empty() => {
            presenter.warn("No audio input devices found");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(devices) => {
            for device in devices {
                if device.is_default {
                    presenter.output(&format!("{} (default)", device.name));
                } else {
                    presenter.output(&device.name);
                }
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    let env_config = AppConfig {
        device: env::var(ENV_DEVICE).ok().filter(|s| !s.is_empty()),
        log_level: env::var(ENV_LOG).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Default clip path for `record`: `<dir>/recording-<unix seconds>.wav`
pub fn default_record_output(dir: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Path::new(dir).join(format!("recording-{}.wav", stamp))
}

/// Acquire the input and start capturing
async fn begin<I, D>(session: &mut AudioCaptureEncoder<I, D>) -> Result<(), String>
where
    I: AudioInput,
    D: AudioDecoder + 'static,
{
    session
        .initialize()
        .await
        .map_err(|e| format!("Failed to open audio input: {}", e))?;
    session
        .start()
        .map_err(|e| format!("Failed to start capture: {}", e))
}

async fn save_outcome(outcome: StopOutcome, output: &Path, presenter: &mut Presenter) -> ExitCode {
    let clip = match outcome {
        StopOutcome::Clip(clip) => clip,
        StopOutcome::NothingRecorded => {
            presenter.spinner_fail("No audio captured");
            return ExitCode::from(EXIT_ERROR);
        }
        StopOutcome::Failed(e) => {
            presenter.spinner_fail(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = write_clip(&clip, output).await {
        presenter.spinner_fail(&format!("Failed to write {}: {}", output.display(), e));
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.spinner_success(&format!(
        "Saved {} ({}, {})",
        output.display(),
        clip.human_readable_size(),
        format_millis(clip.duration_ms())
    ));
    presenter.output(&output.display().to_string());
    ExitCode::from(EXIT_SUCCESS)
}

async fn write_clip(clip: &EncodedClip, output: &Path) -> std::io::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(output, clip.data()).await
}

fn format_millis(ms: u64) -> String {
    format!("{:.2}s", ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_output_is_timestamped_wav() {
        let path = default_record_output("/tmp/clips");
        assert!(path.starts_with("/tmp/clips"));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".wav"));
    }

    #[test]
    fn millis_formatting() {
        assert_eq!(format_millis(1500), "1.50s");
        assert_eq!(format_millis(0), "0.00s");
    }

    #[tokio::test]
    async fn write_clip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("clip.wav");
        let clip = EncodedClip::encode(&[0.0; 4], Default::default()).unwrap();

        write_clip(&clip, &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap().len(), 52);
    }
}
