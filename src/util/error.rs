//! Error types for refmatch.

use thiserror::Error;

/// Result alias for refmatch operations.
pub type RefMatchResult<T> = std::result::Result<T, RefMatchError>;

/// Errors that can occur while normalizing, describing, or matching images.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RefMatchError {
    /// The input bytes are empty or not a supported compressed image.
    #[error("{reason}")]
    ImageFormat { reason: String },
    /// The resolved similarity threshold lies outside `[0, 1]`.
    #[error("threshold must be in 0.0-1.0, got {value}")]
    InvalidThreshold { value: f32 },
    /// An unexpected failure during extraction or matching.
    #[error("internal error: {reason}")]
    Internal { reason: String },
    /// Two descriptor sets with different row widths were compared.
    #[error("descriptor width mismatch: {left} vs {right} bytes")]
    DescriptorWidthMismatch { left: usize, right: usize },
    /// Descriptor storage does not divide into rows of the declared width.
    #[error("invalid descriptor data: {len} bytes for width {width}")]
    InvalidDescriptorData { len: usize, width: usize },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A configuration value is out of its allowed range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl RefMatchError {
    pub(crate) fn image_format(reason: impl Into<String>) -> Self {
        Self::ImageFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}
