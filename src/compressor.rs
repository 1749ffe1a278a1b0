use crate::constants::{
    BACKDROP_RGB, DEFAULT_EFFORT, MAX_EFFORT, MAX_FILE_SIZE, MAX_IMAGE_DIMENSION, MAX_QUALITY,
    MIN_QUALITY,
};
use crate::error::{CompressError, Result};
use crate::formats::OutputFormat;
use image::{imageops::FilterType, DynamicImage, ImageReader, RgbImage, RgbaImage};
use jpeg_encoder::{ColorType, Encoder as JpegEncoder};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Immutable description of one output variant.
///
/// Validation happens at construction, so every `CompressionSpec` handed to
/// the encoder is known to be in range.
#[derive(Debug, Clone)]
pub struct CompressionSpec {
    pub format: OutputFormat,
    pub quality: u8,
    pub max_width: Option<u32>,
    /// WebP-only: encoder effort, 0 (fastest) to 6 (smallest output).
    pub effort: u8,
    /// JPEG-only: progressive scan layout instead of baseline.
    pub progressive: bool,
}

impl CompressionSpec {
    pub fn new(format: OutputFormat, quality: u8) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressError::InvalidQuality(quality));
        }
        Ok(Self {
            format,
            quality,
            max_width: None,
            effort: DEFAULT_EFFORT,
            progressive: false,
        })
    }

    pub fn jpeg(quality: u8) -> Result<Self> {
        Self::new(OutputFormat::Jpeg, quality)
    }

    pub fn webp(quality: u8) -> Result<Self> {
        Self::new(OutputFormat::WebP, quality)
    }

    pub fn with_max_width(mut self, max_width: u32) -> Result<Self> {
        if max_width == 0 {
            return Err(CompressError::InvalidMaxWidth(max_width));
        }
        self.max_width = Some(max_width);
        Ok(self)
    }

    pub fn with_effort(mut self, effort: u8) -> Result<Self> {
        if effort > MAX_EFFORT {
            return Err(CompressError::InvalidEffort(effort));
        }
        self.effort = effort;
        Ok(self)
    }

    pub fn with_progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }
}

/// Size metrics for one encode. `original_size` is the byte length of the
/// source file, not the decoded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionResult {
    pub original_size: u64,
    pub encoded_size: u64,
}

impl CompressionResult {
    pub fn new(original_size: u64, encoded_size: u64) -> Self {
        Self {
            original_size,
            encoded_size,
        }
    }

    /// Percent reduction relative to the source file. Negative when the
    /// encoded variant came out larger.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.encoded_size as f64 / self.original_size as f64) * 100.0
    }
}

/// One encoded output variant: the bytes plus the metrics the report needs.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub result: CompressionResult,
}

/// Flattens any alpha channel onto the fixed backdrop and converts every
/// remaining mode to RGB8. Already-opaque RGB8 images pass through unchanged.
///
/// The output is always RGB8, which both encoders require.
pub fn normalize(img: DynamicImage) -> DynamicImage {
    if matches!(img, DynamicImage::ImageRgb8(_)) {
        return img;
    }
    if img.color().has_alpha() {
        DynamicImage::ImageRgb8(flatten_onto_backdrop(&img.to_rgba8()))
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

/// Composites an RGBA image over the backdrop color using the alpha channel
/// as the blend mask.
fn flatten_onto_backdrop(rgba: &RgbaImage) -> RgbImage {
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = src[3] as u32;
        for c in 0..3 {
            let fg = src[c] as u32;
            let bg = BACKDROP_RGB[c] as u32;
            // Integer blend with rounding: (fg*a + bg*(255-a)) / 255
            dst[c] = ((fg * alpha + bg * (255 - alpha) + 127) / 255) as u8;
        }
    }
    out
}

/// Downscales to `max_width` preserving aspect ratio, using Lanczos
/// resampling. Images at or under `max_width` are returned untouched.
pub fn resize_to_width(img: &DynamicImage, max_width: u32) -> Result<Cow<'_, DynamicImage>> {
    if max_width == 0 {
        return Err(CompressError::InvalidMaxWidth(max_width));
    }
    if img.width() <= max_width {
        return Ok(Cow::Borrowed(img));
    }
    let scale = max_width as f64 / img.width() as f64;
    let new_height = (img.height() as f64 * scale).round().max(1.0) as u32;
    Ok(Cow::Owned(img.resize_exact(
        max_width,
        new_height,
        FilterType::Lanczos3,
    )))
}

/// Encodes an already-normalized image per the spec.
///
/// `original_size` is the source file's byte length, carried through into the
/// returned metrics. Fails with a typed error when the codec rejects the
/// image; it never returns empty bytes as success.
pub fn encode(img: &DynamicImage, spec: &CompressionSpec, original_size: u64) -> Result<Encoded> {
    let rgb: Cow<'_, RgbImage> = match img {
        DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
        _ => Cow::Owned(img.to_rgb8()),
    };
    let (width, height) = rgb.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(CompressError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    let bytes = match spec.format {
        OutputFormat::Jpeg => encode_jpeg(&rgb, spec)?,
        OutputFormat::WebP => encode_webp(&rgb, spec)?,
    };

    let result = CompressionResult::new(original_size, bytes.len() as u64);
    Ok(Encoded {
        format: spec.format,
        bytes,
        result,
    })
}

fn encode_jpeg(rgb: &RgbImage, spec: &CompressionSpec) -> Result<Vec<u8>> {
    let (width, height) = rgb.dimensions();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new(&mut buf, spec.quality);
    encoder.set_progressive(spec.progressive);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(rgb.as_raw(), width as u16, height as u16, ColorType::Rgb)?;
    Ok(buf)
}

fn encode_webp(rgb: &RgbImage, spec: &CompressionSpec) -> Result<Vec<u8>> {
    let (width, height) = rgb.dimensions();
    let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
    let mut config = webp::WebPConfig::new()
        .map_err(|_| CompressError::WebPEncode("failed to initialize encoder config".into()))?;
    config.quality = spec.quality as f32;
    config.method = spec.effort as i32;
    let mem = encoder
        .encode_advanced(&config)
        .map_err(|e| CompressError::WebPEncode(format!("{:?}", e)))?;
    Ok(mem.to_vec())
}

/// Returns whichever candidate encoded smaller. Ties favor `first`, and the
/// winner's `format` field says which format won.
pub fn pick_smaller(first: Encoded, second: Encoded) -> Encoded {
    if second.bytes.len() < first.bytes.len() {
        second
    } else {
        first
    }
}

/// Loads an image file, enforcing the file-size and dimension limits, and
/// returns it with the source file's byte length.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    if !input_path.exists() {
        return Err(CompressError::FileNotFound(input_path.to_path_buf()));
    }

    let file_size = fs::metadata(input_path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(CompressError::FileTooLarge(file_size, MAX_FILE_SIZE));
    }

    let img = ImageReader::open(input_path)?
        .with_guessed_format()?
        .decode()?;

    let (width, height) = (img.width(), img.height());
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(CompressError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    Ok((img, file_size))
}

/// Full single-variant pipeline: load, normalize, resize, encode.
pub fn compress_file(input: &Path, spec: &CompressionSpec) -> Result<Encoded> {
    let (img, original_size) = load_image_with_metadata(input)?;
    let normalized = normalize(img);
    encode_variant(&normalized, spec, original_size)
}

/// Encodes both specs from one decode and keeps whichever came out smaller.
/// Ties favor the first spec.
pub fn compress_file_smallest(
    input: &Path,
    first: &CompressionSpec,
    second: &CompressionSpec,
) -> Result<Encoded> {
    let (img, original_size) = load_image_with_metadata(input)?;
    let normalized = normalize(img);
    let a = encode_variant(&normalized, first, original_size)?;
    let b = encode_variant(&normalized, second, original_size)?;
    Ok(pick_smaller(a, b))
}

fn encode_variant(
    normalized: &DynamicImage,
    spec: &CompressionSpec,
    original_size: u64,
) -> Result<Encoded> {
    match spec.max_width {
        Some(max_width) => {
            let resized = resize_to_width(normalized, max_width)?;
            encode(&resized, spec, original_size)
        }
        None => encode(normalized, spec, original_size),
    }
}
