//! Cassette replay integration tests — zero network I/O.
//!
//! Every test points `PIXPROMPT_REPLAY` at a cassette written into a scratch
//! directory, so the binary never contacts a live endpoint.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;

fn cmd(cassette: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pixprompt");
    cmd.env("PIXPROMPT_CONFIG", "/nonexistent/pixprompt/config.toml")
        .env("PIXPROMPT_REPLAY", cassette)
        .env_remove("PIXPROMPT_REC")
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pixprompt_it_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn tiny_image(format: image::ImageFormat) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(1, 1);
    let mut buf = std::io::Cursor::new(Vec::<u8>::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Write a single-interaction cassette whose output is the given YAML block.
fn cassette(dir: &Path, output_yaml: &str) -> PathBuf {
    let path = dir.join("run.cassette.yaml");
    let content = format!(
        "name: test\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\ninteractions:\n  - seq: 0\n    port: image_generator\n    method: generate\n    input: {{}}\n    output:\n{output_yaml}"
    );
    std::fs::write(&path, content).unwrap();
    path
}

fn images_output(images: &[(&[u8], &str)]) -> String {
    if images.is_empty() {
        return "      Ok:\n        images: []\n".to_string();
    }
    let mut yaml = "      Ok:\n        images:\n".to_string();
    for (data, mime) in images {
        yaml.push_str(&format!("          - data: {}\n            mime_type: {mime}\n", encode(data)));
    }
    yaml
}

#[test]
fn happy_path_saves_returned_bytes() {
    let dir = scratch("happy");
    let png = tiny_image(image::ImageFormat::Png);
    let cassette = cassette(&dir, &images_output(&[(&png, "image/png")]));
    let out = dir.join("cat.png");

    cmd(&cassette)
        .args(["--output", out.to_str().unwrap(), "cat"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    assert_eq!(std::fs::read(&out).unwrap(), png);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn only_first_image_is_saved() {
    let dir = scratch("first_only");
    let first = tiny_image(image::ImageFormat::Png);
    let cassette = cassette(&dir, &images_output(&[(&first, "image/png"), (b"second", "image/png")]));

    cmd(&cassette).args(["cat"]).current_dir(&dir).assert().success();

    let saved: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
        .collect();
    assert_eq!(saved.len(), 1, "exactly one image should be written");
    let name = saved[0].file_name().to_string_lossy().into_owned();
    assert!(name.starts_with("cat-"), "unexpected file name: {name}");
    assert_eq!(std::fs::read(saved[0].path()).unwrap(), first);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn zero_images_is_reported() {
    let dir = scratch("empty_result");
    let cassette = cassette(&dir, &images_output(&[]));

    cmd(&cassette)
        .args(["cat"])
        .current_dir(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No image was generated. Please try a different prompt.",
        ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn collaborator_error_is_reported_verbatim() {
    let dir = scratch("collab_error");
    let cassette = cassette(&dir, "      Err: quota exceeded\n");

    cmd(&cassette)
        .args(["cat"])
        .current_dir(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("An error occurred: quota exceeded"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn blank_prompt_never_consumes_the_cassette() {
    let dir = scratch("blank_prompt");
    let path = dir.join("empty.cassette.yaml");
    std::fs::write(&path, "name: empty\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\ninteractions: []\n")
        .unwrap();

    cmd(&path)
        .args(["   "])
        .current_dir(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a prompt."))
        .stderr(predicate::str::contains("Cassette").not());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn jpeg_response_is_converted_to_png() {
    let dir = scratch("convert");
    let jpeg = tiny_image(image::ImageFormat::Jpeg);
    let cassette = cassette(&dir, &images_output(&[(&jpeg, "image/jpeg")]));
    let out = dir.join("converted.png");

    cmd(&cassette)
        .args(["--format", "png", "--output", out.to_str().unwrap(), "a cat"])
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    let _ = std::fs::remove_dir_all(&dir);
}
