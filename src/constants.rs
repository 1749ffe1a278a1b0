/// Backdrop the alpha channel is flattened onto before encoding. Matches the
/// near-black card-back theme of the deck assets.
pub const BACKDROP_RGB: [u8; 3] = [11, 13, 18];

pub const DEFAULT_QUALITY: u8 = 75;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// WebP encoder effort. 0 is fastest, 6 produces the smallest files.
pub const DEFAULT_EFFORT: u8 = 6;
pub const MAX_EFFORT: u8 = 6;

/// Refuse to decode source files larger than this (100 MiB).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Hard per-axis pixel limit. This is also the u16 ceiling of the JPEG
/// encoder, so enforcing it at load time keeps encode infallible on size.
pub const MAX_IMAGE_DIMENSION: u32 = 65_535;

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif", "gif"];
