//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

pub use app::{
    run_devices, run_encode, run_inspect, run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction, EncodeOptions, RecordOptions};
pub use presenter::Presenter;
