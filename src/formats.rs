//! Type-safe handling of the two output formats the compressor produces.

use crate::error::{CompressError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported output image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG with lossy compression, baseline or progressive
    Jpeg,
    /// WebP with lossy compression and a tunable effort level
    WebP,
}

impl OutputFormat {
    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::WebP => "webp",
        }
    }

    /// Format names for CLI help text
    pub fn format_names() -> &'static [&'static str] {
        &["jpeg", "webp"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = CompressError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(CompressError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Determine output format from the output path's extension, with an
/// explicit override taking precedence. Rejects extensions the compressor
/// cannot produce rather than silently falling back.
pub fn determine_output_format(
    output_path: &Path,
    format_override: Option<&str>,
) -> Result<OutputFormat> {
    if let Some(fmt_str) = format_override {
        return fmt_str.parse();
    }

    match output_path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.parse(),
        None => Err(CompressError::UnsupportedFormat(
            "output path has no extension; use --format".to_string(),
        )),
    }
}
