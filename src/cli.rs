use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deckpress",
    about = "Batch-convert card art into size-optimized JPEG and WebP variants",
    long_about = "deckpress re-encodes card images into compressed JPEG and WebP variants, \
                  flattening transparency onto the card-back backdrop and optionally \
                  downscaling to a maximum width. It can keep a single target format or \
                  encode both and keep whichever came out smaller, and reports before/after \
                  size statistics for the whole run.",
    version,
    after_help = "EXAMPLES:\n  \
    deckpress compress card.jpeg card.webp -q 72\n  \
    deckpress compress card.jpeg card_opt.jpeg -q 65 -w 800\n  \
    deckpress batch ./assets/fronts ./assets/fronts -q 65 -f jpeg -w 800 --backup ./assets/fronts_backup\n  \
    deckpress batch \"./assets/fronts/*.jpeg\" ./out -q 60 --smallest --suffix _opt"
)]
pub struct Args {
    #[arg(long, global = true, help = "Suppress informational output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Print per-file compression details")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single image file",
        long_about = "Compress a single image into JPEG or WebP. Transparency is flattened \
                      onto the card-back backdrop before encoding; the target format comes \
                      from the output extension unless --format is given."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            help = "Compression quality (1-100, default: 75)",
            long_help = "Compression quality from 1 (lowest) to 100 (highest), applied to \
                         whichever format is encoded."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'w',
            long = "max-width",
            help = "Maximum width in pixels",
            long_help = "Downscale to this width preserving aspect ratio. Images already at \
                         or under the limit are left at native resolution."
        )]
        max_width: Option<u32>,

        #[arg(
            short = 'f',
            long,
            help = "Output format (jpeg, webp)",
            long_help = "Force output format regardless of the output file extension. \
                         Ignored with --smallest."
        )]
        format: Option<String>,

        #[arg(
            long,
            help = "WebP encoder effort (0-6, default: 6)",
            long_help = "WebP-only: trade encode time for output size. 0 is fastest, \
                         6 produces the smallest files."
        )]
        effort: Option<u8>,

        #[arg(
            long,
            help = "Use progressive JPEG encoding",
            long_help = "JPEG-only: emit a progressive scan layout instead of baseline."
        )]
        progressive: bool,

        #[arg(
            long,
            help = "Encode both JPEG and WebP, keep the smaller",
            long_help = "Encode the image as both JPEG and WebP at the given quality and keep \
                         whichever is byte-smaller. The output extension is adjusted to the \
                         winning format."
        )]
        smallest: bool,
    },

    #[command(
        about = "Compress a directory of images in parallel",
        long_about = "Process every image under a directory, file list, or glob pattern. \
                      Per-file failures are reported and skipped, never aborting the batch, \
                      and an aggregate size report is printed at the end."
    )]
    Batch {
        #[arg(
            help = "Input directory, file, or glob pattern",
            long_help = "Input can be a directory path, a single file, or a glob expression \
                         such as './assets/fronts/*.jpeg'."
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(short = 'q', long, help = "Compression quality (1-100, default: 75)")]
        quality: Option<u8>,

        #[arg(short = 'w', long = "max-width", help = "Maximum width in pixels")]
        max_width: Option<u32>,

        #[arg(
            short = 'f',
            long,
            help = "Output format (jpeg, webp; default: webp)",
            long_help = "Target format for every file. Defaults to webp; ignored with --smallest."
        )]
        format: Option<String>,

        #[arg(long, help = "WebP encoder effort (0-6, default: 6)")]
        effort: Option<u8>,

        #[arg(long, help = "Use progressive JPEG encoding")]
        progressive: bool,

        #[arg(long, help = "Encode both JPEG and WebP per file, keep the smaller")]
        smallest: bool,

        #[arg(
            long,
            default_value = "",
            help = "Suffix appended to output file stems (e.g. _opt)"
        )]
        suffix: String,

        #[arg(
            long,
            help = "Copy originals into this directory before processing",
            long_help = "Back up originals before they can be overwritten. Files already \
                         present in the backup directory are never replaced, so reruns keep \
                         the first backup intact."
        )]
        backup: Option<PathBuf>,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel threads (default: auto)",
            long_help = "Number of threads for parallel batch processing. \
                         If not specified, uses number of CPU cores."
        )]
        threads: Option<usize>,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,
    },
}
