use crate::compressor::{compress_file, compress_file_smallest, CompressionSpec, Encoded};
use crate::error::{CompressError, Result};
use crate::formats::OutputFormat;
use crate::utils::{format_file_size, is_image_file};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// How many output variants each file produces.
///
/// `Single` writes one format; `Smallest` encodes both and keeps whichever
/// came out byte-smaller, the policy the aggressive optimization pass uses.
#[derive(Debug, Clone)]
pub enum VariantPolicy {
    Single(CompressionSpec),
    Smallest {
        jpeg: CompressionSpec,
        webp: CompressionSpec,
    },
}

impl VariantPolicy {
    pub fn compress(&self, input: &Path) -> Result<Encoded> {
        match self {
            VariantPolicy::Single(spec) => compress_file(input, spec),
            VariantPolicy::Smallest { jpeg, webp } => compress_file_smallest(input, jpeg, webp),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub recursive: bool,
    /// Appended to the file stem of every output ("_opt" -> "042_opt.webp").
    pub suffix: String,
    /// Copy originals here before processing; existing backups are kept.
    pub backup_dir: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_original: u64,
    pub total_encoded: u64,
    pub jpeg_wins: usize,
    pub webp_wins: usize,
}

impl BatchSummary {
    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original == 0 {
            return 0.0;
        }
        (1.0 - self.total_encoded as f64 / self.total_original as f64) * 100.0
    }
}

pub fn batch_compress_images(
    input: &str,
    output_dir: &Path,
    policy: &VariantPolicy,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    crate::report!("🚀 Starting batch compression...");
    crate::report!("📁 Input: {}", input);
    crate::report!("📁 Output: {:?}", output_dir);

    let start_time = Instant::now();

    let image_files = collect_image_files(input, options.recursive)?;
    let total_files = image_files.len();

    if total_files == 0 {
        crate::caution!("No image files found in the input path");
        return Ok(BatchSummary::default());
    }

    crate::report!("📊 Found {} image files to process", total_files);

    if let Some(backup_dir) = &options.backup_dir {
        let copied = backup_originals(&image_files, backup_dir)?;
        crate::report!("💾 Backed up {} originals to {:?}", copied, backup_dir);
    }

    fs::create_dir_all(output_dir)
        .map_err(|_| CompressError::DirectoryCreationFailed(output_dir.to_path_buf()))?;

    let main_progress = ProgressBar::new(total_files as u64);
    main_progress.set_style(ProgressStyle::default_bar());

    let processed_count = AtomicUsize::new(0);
    let failed_count = AtomicUsize::new(0);
    let jpeg_wins = AtomicUsize::new(0);
    let webp_wins = AtomicUsize::new(0);
    let total_size_before = AtomicU64::new(0);
    let total_size_after = AtomicU64::new(0);

    // Each file is independent; failures are reported and skipped so one bad
    // file never aborts the batch.
    image_files.par_iter().for_each(|input_path| {
        match process_single_image(input_path, output_dir, policy, &options.suffix) {
            Ok(encoded) => {
                total_size_before.fetch_add(encoded.result.original_size, Ordering::Relaxed);
                total_size_after.fetch_add(encoded.result.encoded_size, Ordering::Relaxed);
                processed_count.fetch_add(1, Ordering::Relaxed);
                match encoded.format {
                    OutputFormat::Jpeg => jpeg_wins.fetch_add(1, Ordering::Relaxed),
                    OutputFormat::WebP => webp_wins.fetch_add(1, Ordering::Relaxed),
                };
                crate::per_file!(
                    "{} | {} → {} ({}) | -{:.1}%",
                    input_path.display(),
                    format_file_size(encoded.result.original_size),
                    format_file_size(encoded.result.encoded_size),
                    encoded.format,
                    encoded.result.reduction_percent()
                );
            }
            Err(e) => {
                crate::fail!("Failed to process {:?}: {}", input_path, e);
                failed_count.fetch_add(1, Ordering::Relaxed);
            }
        }
        main_progress.inc(1);
    });

    main_progress.finish_with_message("✅ Batch compression complete");

    let summary = BatchSummary {
        processed: processed_count.load(Ordering::Relaxed),
        failed: failed_count.load(Ordering::Relaxed),
        total_original: total_size_before.load(Ordering::Relaxed),
        total_encoded: total_size_after.load(Ordering::Relaxed),
        jpeg_wins: jpeg_wins.load(Ordering::Relaxed),
        webp_wins: webp_wins.load(Ordering::Relaxed),
    };

    let elapsed_time = start_time.elapsed();

    crate::report!("\n📊 Batch Compression Summary:");
    crate::report!("  📁 Total files processed: {}", summary.processed);
    crate::report!(
        "  📊 Total original size: {} bytes ({})",
        summary.total_original,
        format_file_size(summary.total_original)
    );
    crate::report!(
        "  📊 Total compressed size: {} bytes ({})",
        summary.total_encoded,
        format_file_size(summary.total_encoded)
    );
    crate::report!(
        "  🎯 Overall compression ratio: {:.1}%",
        summary.overall_reduction_percent()
    );
    if matches!(policy, VariantPolicy::Smallest { .. }) {
        crate::report!(
            "  🏆 Format wins: WebP {} / JPEG {}",
            summary.webp_wins,
            summary.jpeg_wins
        );
    }
    crate::report!("  ⏱️  Total time: {:?}", elapsed_time);
    if summary.processed > 0 {
        crate::report!(
            "  ⚡ Average speed: {:.2} files/second",
            summary.processed as f64 / elapsed_time.as_secs_f64().max(f64::EPSILON)
        );
    }
    if summary.failed > 0 {
        crate::caution!("Failed files: {}", summary.failed);
    }

    Ok(summary)
}

pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    let input_path = Path::new(input);

    if input_path.is_file() {
        image_files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            walkdir::WalkDir::new(input_path).into_iter()
        } else {
            walkdir::WalkDir::new(input_path).max_depth(1).into_iter()
        };

        for entry in walker.filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.')) {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_image_file(path) {
                image_files.push(path.to_path_buf());
            }
        }
    } else if let Ok(glob_pattern) = glob(input) {
        for entry in glob_pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) {
                image_files.push(entry);
            }
        }
    } else {
        return Err(CompressError::NoImageFilesFound(input.to_string()));
    }

    image_files.sort();
    Ok(image_files)
}

/// Copies originals into `backup_dir` before they can be overwritten.
/// Files already present in the backup directory are left alone, so reruns
/// never clobber the first backup with an already-compressed copy.
pub fn backup_originals(files: &[PathBuf], backup_dir: &Path) -> Result<usize> {
    fs::create_dir_all(backup_dir)
        .map_err(|_| CompressError::DirectoryCreationFailed(backup_dir.to_path_buf()))?;

    let mut copied = 0;
    for file in files {
        let file_name = match file.file_name() {
            Some(name) => name,
            None => continue,
        };
        let target = backup_dir.join(file_name);
        if !target.exists() {
            fs::copy(file, &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn process_single_image(
    input_path: &Path,
    output_dir: &Path,
    policy: &VariantPolicy,
    suffix: &str,
) -> Result<Encoded> {
    let encoded = policy.compress(input_path)?;
    let output_path = generate_output_path(input_path, output_dir, suffix, encoded.format)?;
    fs::write(&output_path, &encoded.bytes)?;
    Ok(encoded)
}

pub fn generate_output_path(
    input_path: &Path,
    output_dir: &Path,
    suffix: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressError::UnsupportedFormat("Invalid file name".to_string()))?;

    let output_filename = format!(
        "{}{}.{}",
        file_stem.to_string_lossy(),
        suffix,
        format.extension()
    );
    Ok(output_dir.join(output_filename))
}
