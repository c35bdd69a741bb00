//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::recording::Duration;

/// fleet-voice - capture speech as 16 kHz mono WAV clips
#[derive(Parser, Debug)]
#[command(name = "fleet-voice")]
#[command(version)]
#[command(about = "Capture speech as 16 kHz mono 16-bit WAV clips")]
#[command(long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record from the microphone and write a WAV clip
    Record {
        /// Recording duration (e.g., 500ms, 10s, 1m, 2m30s)
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,

        /// Output file (default: <output_dir>/recording-<timestamp>.wav)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Input device name (see `fleet-voice devices`)
        #[arg(long, value_name = "NAME")]
        device: Option<String>,
    },
    /// Run an encoded audio file through the capture pipeline
    Encode {
        /// Audio file to transcode (FLAC, WAV, OGG, MP3, ...)
        input: PathBuf,

        /// Output file (default: <input>.16k.wav)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Bytes per delivered chunk
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<usize>,
    },
    /// Print the header of a WAV file
    Inspect {
        /// WAV file to inspect
        file: PathBuf,
    },
    /// List audio input devices
    Devices,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub duration: Duration,
    pub output: PathBuf,
    pub device: Option<String>,
    pub chunk_size: usize,
}

/// Parsed encode options
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub chunk_size: usize,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "duration",
    "device",
    "output_dir",
    "chunk_size",
    "log_level",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// Default output for `encode`: next to the input, as `<stem>.16k.wav`
pub fn default_encode_output(input: &std::path::Path) -> PathBuf {
    input.with_extension("16k.wav")
}
