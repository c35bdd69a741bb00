//! Error scenario integration tests

use std::process::{Command, Output};

fn fleet_voice_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fleet-voice"))
}

/// Run with an empty, throwaway config directory
fn run_isolated(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    fleet_voice_bin()
        .args(args)
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("FLEET_VOICE_DEVICE")
        .env_remove("FLEET_VOICE_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn missing_subcommand_is_usage_error() {
    let output = run_isolated(&[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_duration_is_usage_error() {
    let output = run_isolated(&["record", "--duration", "invalid"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn non_ascii_duration_is_usage_error() {
    let output = run_isolated(&["record", "--duration", "5é"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid duration"), "got: {}", stderr);
}

#[test]
fn zero_chunk_size_is_usage_error() {
    let output = run_isolated(&["encode", "in.wav", "--chunk-size", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_get_unknown_key() {
    let output = run_isolated(&["config", "get", "unknown_key"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let output = run_isolated(&["config", "set", "api_key", "value"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Valid keys"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_duration() {
    let output = run_isolated(&["config", "set", "duration", "soon"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duration"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_chunk_size() {
    let output = run_isolated(&["config", "set", "chunk_size", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("positive"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_log_level() {
    let output = run_isolated(&["config", "set", "log_level", "loud"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Valid options"), "got: {}", stderr);
}

#[test]
fn config_list_with_no_file() {
    let output = run_isolated(&["config", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") && stdout.contains("chunk_size"),
        "Expected config list output, got: {}",
        stdout
    );
}

#[test]
fn encode_missing_file_fails() {
    let output = run_isolated(&["encode", "/nonexistent/take.flac"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "got: {}", stderr);
}

#[test]
fn encode_garbage_reports_decode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("noise.bin");
    std::fs::write(&input, vec![0x5a; 4096]).unwrap();

    let output = fleet_voice_bin()
        .arg("encode")
        .arg(&input)
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("decode"), "got: {}", stderr);
    assert!(!dir.path().join("noise.16k.wav").exists());
}

#[test]
fn inspect_rejects_non_wav() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.wav");
    std::fs::write(&path, b"definitely not a riff file, but long enough to parse").unwrap();

    let output = fleet_voice_bin()
        .arg("inspect")
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("RIFF"), "got: {}", stderr);
}
