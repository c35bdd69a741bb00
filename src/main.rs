//! fleet-voice CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use fleet_voice::cli::{
    app::{default_record_output, load_merged_config},
    args::{default_encode_output, Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    run_devices, run_encode, run_inspect, run_record, EncodeOptions, RecordOptions, EXIT_ERROR,
    EXIT_USAGE_ERROR,
};
use fleet_voice::domain::config::AppConfig;
use fleet_voice::domain::recording::Duration;
use fleet_voice::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    let cli_config = match &cli.command {
        Commands::Record {
            duration, device, ..
        } => AppConfig {
            duration: duration.clone(),
            device: device.clone(),
            ..Default::default()
        },
        Commands::Encode { chunk_size, .. } => {
            if *chunk_size == Some(0) {
                presenter.error("Invalid chunk size: must be at least 1 byte");
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
            AppConfig {
                chunk_size: *chunk_size,
                ..Default::default()
            }
        }
        _ => AppConfig::empty(),
    };

    let config = load_merged_config(cli_config).await;
    init_tracing(cli.verbose, config.log_level_or_default());

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Devices => run_devices(),
        Commands::Inspect { file } => run_inspect(&file).await,
        Commands::Encode { input, output, .. } => {
            let output = output.unwrap_or_else(|| default_encode_output(&input));
            run_encode(EncodeOptions {
                input,
                output,
                chunk_size: config.chunk_size_or_default(),
            })
            .await
        }
        Commands::Record { output, .. } => {
            let duration = match config.duration.as_ref() {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => d,
                    Err(e) => {
                        presenter.error(&format!("Invalid duration: {}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => Duration::default_duration(),
            };

            let output =
                output.unwrap_or_else(|| default_record_output(config.output_dir_or_default()));

            run_record(RecordOptions {
                duration,
                output,
                device: config.device.clone(),
                chunk_size: config.chunk_size_or_default(),
            })
            .await
        }
    }
}

/// Log to stderr. `-v` flags win over the configured level.
fn init_tracing(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured.parse().unwrap_or(LevelFilter::WARN),
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
