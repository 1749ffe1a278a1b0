use clap::Parser;
use deckpress::cli::{Args, Commands};
use deckpress::compressor::CompressionSpec;
use deckpress::constants::DEFAULT_QUALITY;
use deckpress::formats::determine_output_format;
use deckpress::utils::format_file_size;
use deckpress::{batch_compress_images, fail, report, BatchOptions, Result, VariantPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::Path;

fn main() {
    let args = Args::parse();
    report::set_level(report::level_from_flags(args.quiet, args.verbose));

    if let Err(e) = run(args.command) {
        fail!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Compress {
            input,
            output,
            quality,
            max_width,
            format,
            effort,
            progressive,
            smallest,
        } => {
            let policy = if smallest {
                build_smallest_policy(quality, max_width, effort, progressive)?
            } else {
                let format = determine_output_format(&output, format.as_deref())?;
                VariantPolicy::Single(build_spec(
                    format,
                    quality,
                    max_width,
                    effort,
                    progressive,
                )?)
            };
            compress_single(&input, &output, &policy)
        }
        Commands::Batch {
            input,
            output,
            quality,
            max_width,
            format,
            effort,
            progressive,
            smallest,
            suffix,
            backup,
            threads,
            recursive,
        } => {
            setup_thread_pool(threads);
            let policy = if smallest {
                build_smallest_policy(quality, max_width, effort, progressive)?
            } else {
                let format = format.as_deref().unwrap_or("webp").parse()?;
                VariantPolicy::Single(build_spec(
                    format,
                    quality,
                    max_width,
                    effort,
                    progressive,
                )?)
            };
            let options = BatchOptions {
                recursive,
                suffix,
                backup_dir: backup,
            };
            batch_compress_images(&input, &output, &policy, &options)?;
            Ok(())
        }
    }
}

fn build_spec(
    format: deckpress::OutputFormat,
    quality: Option<u8>,
    max_width: Option<u32>,
    effort: Option<u8>,
    progressive: bool,
) -> Result<CompressionSpec> {
    let mut spec =
        CompressionSpec::new(format, quality.unwrap_or(DEFAULT_QUALITY))?.with_progressive(progressive);
    if let Some(width) = max_width {
        spec = spec.with_max_width(width)?;
    }
    if let Some(effort) = effort {
        spec = spec.with_effort(effort)?;
    }
    Ok(spec)
}

fn build_smallest_policy(
    quality: Option<u8>,
    max_width: Option<u32>,
    effort: Option<u8>,
    progressive: bool,
) -> Result<VariantPolicy> {
    let jpeg = build_spec(
        deckpress::OutputFormat::Jpeg,
        quality,
        max_width,
        None,
        progressive,
    )?;
    let webp = build_spec(
        deckpress::OutputFormat::WebP,
        quality,
        max_width,
        effort,
        false,
    )?;
    Ok(VariantPolicy::Smallest { jpeg, webp })
}

fn compress_single(input: &Path, output: &Path, policy: &VariantPolicy) -> Result<()> {
    report!("🗜️  Compressing image: {:?}", input);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message("Compressing...");

    let encoded = policy.compress(input)?;
    pb.finish_and_clear();

    // With --smallest the winner decides the extension.
    let output = match policy {
        VariantPolicy::Smallest { .. } => output.with_extension(encoded.format.extension()),
        VariantPolicy::Single(_) => output.to_path_buf(),
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|_| deckpress::CompressError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }
    fs::write(&output, &encoded.bytes)?;

    report!("📁 Output: {:?} ({})", output, encoded.format);
    report!(
        "📊 Original size: {} bytes ({})",
        encoded.result.original_size,
        format_file_size(encoded.result.original_size)
    );
    report!(
        "📈 Compressed size: {} bytes ({})",
        encoded.result.encoded_size,
        format_file_size(encoded.result.encoded_size)
    );
    let reduction = encoded.result.reduction_percent();
    report!("🎯 Compression ratio: {:.1}%", reduction);
    if reduction > 0.0 {
        report!("✅ Successfully reduced file size by {:.1}%", reduction);
    } else {
        deckpress::caution!("File size increased by {:.1}%", reduction.abs());
    }

    Ok(())
}

fn setup_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to set thread pool size: {}", e);
            });
    }
}
