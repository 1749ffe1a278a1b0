use assert_cmd::Command;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn write_gradient_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    DynamicImage::ImageRgb8(img).save(path).unwrap();
}

fn write_alpha_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let alpha = if x % 2 == 0 { 0 } else { 255 };
        Rgba([200, 40, 90, alpha])
    });
    DynamicImage::ImageRgba8(img).save(path).unwrap();
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn test_compress_help() {
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args(["compress", "--help"]);
    // Both subcommands must tell users that --smallest overrides --format.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Ignored with --smallest"));
}

#[test]
fn test_batch_help() {
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args(["batch", "--help"]);
    cmd.assert().success();
}

#[test]
fn test_compress_missing_args() {
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args(["compress"]);
    cmd.assert().failure();
}

#[test]
fn test_compress_nonexistent_file() {
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args(["compress", "nonexistent.jpeg", "output.jpeg"]);
    cmd.assert().failure();
}

#[test]
fn test_compress_invalid_quality() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("card.jpeg");
    write_gradient_jpeg(&input, 64, 64);

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "compress",
        &input.to_string_lossy(),
        &temp_dir.path().join("out.jpeg").to_string_lossy(),
        "--quality",
        "0",
    ]);
    cmd.assert().failure();
}

#[test]
fn test_compress_invalid_max_width() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("card.jpeg");
    write_gradient_jpeg(&input, 64, 64);

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "compress",
        &input.to_string_lossy(),
        &temp_dir.path().join("out.jpeg").to_string_lossy(),
        "--max-width",
        "0",
    ]);
    cmd.assert().failure();
}

#[test]
fn test_compress_flattens_alpha_and_resizes() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("card.png");
    let output = temp_dir.path().join("card_opt.jpeg");
    write_alpha_png(&input, 160, 120);

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "compress",
        &input.to_string_lossy(),
        &output.to_string_lossy(),
        "--quality",
        "65",
        "--max-width",
        "80",
        "--progressive",
    ]);
    cmd.assert().success();

    let decoded = image::open(&output).unwrap();
    assert_eq!(decoded.dimensions(), (80, 60));
    assert!(!decoded.color().has_alpha());
}

#[test]
fn test_compress_webp_from_extension() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("card.jpeg");
    let output = temp_dir.path().join("card.webp");
    write_gradient_jpeg(&input, 64, 64);

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "compress",
        &input.to_string_lossy(),
        &output.to_string_lossy(),
        "--quality",
        "72",
    ]);
    cmd.assert().success();

    let decoded = image::open(&output).unwrap();
    assert_eq!(decoded.dimensions(), (64, 64));
}

#[test]
fn test_compress_smallest_picks_one_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("card.jpeg");
    let output = temp_dir.path().join("card_opt.jpeg");
    write_gradient_jpeg(&input, 128, 128);

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "compress",
        &input.to_string_lossy(),
        &output.to_string_lossy(),
        "--quality",
        "60",
        "--smallest",
    ]);
    cmd.assert().success();

    let jpeg_out = temp_dir.path().join("card_opt.jpeg");
    let webp_out = temp_dir.path().join("card_opt.webp");
    assert!(
        jpeg_out.exists() ^ webp_out.exists(),
        "exactly one winning variant should be written"
    );
}

#[test]
fn test_batch_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("output");

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "batch",
        &temp_dir.path().to_string_lossy(),
        &output_dir.to_string_lossy(),
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("No image files"));
}

#[test]
fn test_batch_continues_past_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("fronts");
    let output_dir = temp_dir.path().join("out");
    std::fs::create_dir(&input_dir).unwrap();

    write_gradient_jpeg(&input_dir.join("good.jpeg"), 64, 64);
    File::create(input_dir.join("bad.jpeg"))
        .unwrap()
        .write_all(b"not an image at all")
        .unwrap();

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "batch",
        &input_dir.to_string_lossy(),
        &output_dir.to_string_lossy(),
        "-f",
        "webp",
        "-q",
        "60",
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Failed to process"));

    assert!(output_dir.join("good.webp").exists());
    assert!(!output_dir.join("bad.webp").exists());
}

#[test]
fn test_batch_suffix_and_format() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("fronts");
    let output_dir = temp_dir.path().join("out");
    std::fs::create_dir(&input_dir).unwrap();

    write_gradient_jpeg(&input_dir.join("001.jpeg"), 64, 64);
    write_gradient_jpeg(&input_dir.join("002.jpeg"), 64, 64);

    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "batch",
        &input_dir.to_string_lossy(),
        &output_dir.to_string_lossy(),
        "--suffix",
        "_opt",
        "-f",
        "webp",
    ]);
    cmd.assert().success();

    assert!(output_dir.join("001_opt.webp").exists());
    assert!(output_dir.join("002_opt.webp").exists());
}

#[test]
fn test_batch_backup_preserves_originals() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("fronts");
    let backup_dir = temp_dir.path().join("fronts_backup");
    std::fs::create_dir(&input_dir).unwrap();

    let original = input_dir.join("001.jpeg");
    write_gradient_jpeg(&original, 64, 64);
    let original_bytes = std::fs::read(&original).unwrap();

    // In-place recompression: output dir == input dir.
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args([
        "batch",
        &input_dir.to_string_lossy(),
        &input_dir.to_string_lossy(),
        "-f",
        "jpeg",
        "-q",
        "65",
        "--backup",
        &backup_dir.to_string_lossy(),
    ]);
    cmd.assert().success();

    let backed_up = std::fs::read(backup_dir.join("001.jpeg")).unwrap();
    assert_eq!(backed_up, original_bytes);
}

#[test]
fn test_batch_glob_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("fronts");
    let output_dir = temp_dir.path().join("out");
    std::fs::create_dir(&input_dir).unwrap();

    write_gradient_jpeg(&input_dir.join("001.jpeg"), 64, 64);
    write_alpha_png(&input_dir.join("ignored.png"), 64, 64);

    let pattern = format!("{}/*.jpeg", input_dir.to_string_lossy());
    let mut cmd = Command::cargo_bin("deckpress").unwrap();
    cmd.args(["batch", &pattern, &output_dir.to_string_lossy(), "-f", "webp"]);
    cmd.assert().success();

    assert!(output_dir.join("001.webp").exists());
    assert!(!output_dir.join("ignored.webp").exists());
}
