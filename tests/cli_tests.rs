//! CLI integration tests

use std::path::Path;
use std::process::Command;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;

fn fleet_voice_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fleet-voice"))
}

/// Binary with its config directory pointed at `dir`
fn isolated(dir: &Path) -> AssertCommand {
    let mut cmd = AssertCommand::cargo_bin("fleet-voice").expect("binary builds");
    cmd.env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("FLEET_VOICE_DEVICE")
        .env_remove("FLEET_VOICE_LOG");
    cmd
}

fn write_tone_wav(path: &Path, sample_rate: u32, frames: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 0.5;
        writer.write_sample((sample * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn help_output() {
    let output = fleet_voice_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("WAV"));
    for command in ["record", "encode", "inspect", "devices", "config"] {
        assert!(stdout.contains(command), "help is missing {}", command);
    }
    assert!(stdout.contains("--verbose"));
}

#[test]
fn version_output() {
    let output = fleet_voice_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fleet-voice"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn record_help_lists_options() {
    let output = fleet_voice_bin()
        .args(["record", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--duration"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--device"));
}

#[test]
fn config_path_command() {
    let dir = tempfile::tempdir().unwrap();
    isolated(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fleet-voice"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();

    isolated(dir.path())
        .args(["config", "set", "chunk_size", "4096"])
        .assert()
        .success();

    isolated(dir.path())
        .args(["config", "get", "chunk_size"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4096"));
}

#[test]
fn config_init_then_list() {
    let dir = tempfile::tempdir().unwrap();

    isolated(dir.path()).args(["config", "init"]).assert().success();

    isolated(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duration"))
        .stdout(predicate::str::contains("10s"))
        .stdout(predicate::str::contains("log_level"));

    // A second init must not overwrite
    isolated(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn inspect_prints_header_fields() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("tone.wav");
    write_tone_wav(&wav, 16000, 16000);

    isolated(dir.path())
        .arg("inspect")
        .arg(&wav)
        .assert()
        .success()
        .stdout(predicate::str::contains("16000 Hz mono 16-bit"))
        .stdout(predicate::str::contains("32000"))
        .stdout(predicate::str::contains("1.00s"));
}

#[test]
fn encode_wav_writes_speech_clip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("take.wav");
    let output = dir.path().join("out.wav");
    write_tone_wav(&input, 16000, 1600);

    isolated(dir.path())
        .arg("encode")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--chunk-size", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("out.wav"));

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(bytes.len(), 44 + 2 * 1600);
}

#[test]
fn encode_default_output_sits_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("take.wav");
    write_tone_wav(&input, 16000, 160);

    isolated(dir.path())
        .arg("encode")
        .arg(&input)
        .assert()
        .success();

    assert!(dir.path().join("take.16k.wav").exists());
}

#[test]
fn encode_resamples_to_16k() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hifi.wav");
    let output = dir.path().join("speech.wav");
    write_tone_wav(&input, 48000, 48000);

    isolated(dir.path())
        .arg("encode")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len(), 16000);
}
