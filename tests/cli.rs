//! CLI argument parsing and validation tests — no network I/O.
//!
//! Invalid options are rejected before any cassette or live adapter is built.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pixprompt");
    cmd.env("PIXPROMPT_CONFIG", "/nonexistent/pixprompt/config.toml")
        .env_remove("PIXPROMPT_REPLAY")
        .env_remove("PIXPROMPT_REC")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_prompt_exits_with_error() {
    cmd().assert().failure().stderr(predicate::str::contains("Provide a prompt string"));
}

#[test]
fn invalid_model_exits_with_error() {
    cmd()
        .args(["--model", "dall-e-3", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider for model"));
}

#[test]
fn imagen_rejects_wide_aspect_ratio() {
    cmd()
        .args(["--model", "imagen-4", "--aspect-ratio", "21:9", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported aspect ratio"));
}

#[test]
fn invalid_format_exits_with_error() {
    cmd()
        .args(["--format", "gif", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

#[test]
fn missing_api_key_is_reported() {
    cmd()
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .args(["--model", "imagen-4", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key for Imagen"));
}

/// Empty replay cassette, so a missing API key cannot be what fails the run.
fn empty_cassette(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("pixprompt_cli_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("empty.cassette.yaml");
    std::fs::write(&path, "name: empty\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\ninteractions: []\n")
        .unwrap();
    path
}

#[test]
fn listen_with_prompt_is_rejected_by_the_parser() {
    let cassette = empty_cassette("listen_prompt");
    cmd()
        .env("PIXPROMPT_REPLAY", &cassette)
        .args(["--listen", "127.0.0.1:0", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn listen_requires_serve() {
    let cassette = empty_cassette("listen_alone");
    cmd()
        .env("PIXPROMPT_REPLAY", &cassette)
        .args(["--listen", "127.0.0.1:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--listen requires --serve"));
}
