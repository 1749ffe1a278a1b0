pub mod batch;
pub mod cli;
pub mod compressor;
pub mod constants;
pub mod error;
pub mod formats;
pub mod report;
pub mod utils;

pub use batch::{
    backup_originals, batch_compress_images, collect_image_files, generate_output_path,
    BatchOptions, BatchSummary, VariantPolicy,
};
pub use compressor::{
    compress_file, compress_file_smallest, encode, load_image_with_metadata, normalize,
    pick_smaller, resize_to_width, CompressionResult, CompressionSpec, Encoded,
};
pub use error::{CompressError, Result};
pub use formats::{determine_output_format, OutputFormat};
