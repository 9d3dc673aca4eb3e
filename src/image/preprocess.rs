//! Normalization of compressed image bytes into a bounded grayscale raster.
//!
//! The pipeline is decode -> optional area downscale of the color raster ->
//! BT.601 luminance conversion. Rasters are never upscaled.

use crate::image::io::{decode_rgb, rgb_to_luma};
use crate::image::resize::resize_area;
use crate::image::RasterImage;
use crate::trace::{trace_event, trace_span};
use crate::util::{RefMatchError, RefMatchResult};

/// Default bound on the longer raster side.
pub const DEFAULT_MAX_DIMENSION: usize = 512;

/// Configuration for the preprocessor.
#[derive(Clone, Debug)]
pub struct PreprocessConfig {
    /// Maximum length of the longer raster side after normalization.
    pub max_dimension: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

/// Decodes and normalizes query and reference images.
#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    cfg: PreprocessConfig,
}

impl Preprocessor {
    /// Creates a preprocessor, rejecting a zero maximum dimension.
    pub fn new(cfg: PreprocessConfig) -> RefMatchResult<Self> {
        if cfg.max_dimension == 0 {
            return Err(RefMatchError::InvalidConfig {
                reason: "max_dimension must be >= 1",
            });
        }
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PreprocessConfig {
        &self.cfg
    }

    /// Decodes `bytes` into a grayscale raster whose longer side is at most
    /// `max_dimension`.
    ///
    /// Fails with [`RefMatchError::ImageFormat`] when the bytes are empty or
    /// cannot be decoded.
    pub fn normalize(&self, bytes: &[u8]) -> RefMatchResult<RasterImage> {
        let _span = trace_span!("normalize", bytes = bytes.len()).entered();

        let rgb = decode_rgb(bytes)?;
        let width = rgb.width() as usize;
        let height = rgb.height() as usize;
        let (dst_width, dst_height) = target_size(width, height, self.cfg.max_dimension);

        let rgb = if (dst_width, dst_height) == (width, height) {
            rgb.into_raw()
        } else {
            resize_area(rgb.as_raw(), width, height, 3, dst_width, dst_height)
        };
        let gray = rgb_to_luma(&rgb);

        trace_event!("normalized", width = dst_width, height = dst_height);
        RasterImage::new(gray, dst_width, dst_height)
    }
}

/// Computes the normalized size for a `width x height` image.
///
/// When the longer side exceeds `max_dimension` it becomes exactly
/// `max_dimension` and the shorter side is scaled proportionally (rounded,
/// at least 1). Smaller images keep their size.
pub fn target_size(width: usize, height: usize, max_dimension: usize) -> (usize, usize) {
    let long = width.max(height);
    if long <= max_dimension {
        return (width, height);
    }
    let scale_short = |short: usize| -> usize {
        let scaled = (short as f64 * max_dimension as f64 / long as f64).round() as usize;
        scaled.clamp(1, max_dimension)
    };
    if width >= height {
        (max_dimension, scale_short(height))
    } else {
        (scale_short(width), max_dimension)
    }
}
