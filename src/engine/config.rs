//! Engine configuration.

use crate::feature::ExtractorConfig;
use crate::image::preprocess::{PreprocessConfig, DEFAULT_MAX_DIMENSION};
use crate::util::{RefMatchError, RefMatchResult};

/// Default similarity threshold for a positive match.
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Configuration for [`RecognitionEngine`](crate::RecognitionEngine).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Threshold used when a call does not override it.
    pub default_threshold: f32,
    /// Bound on the longer side of normalized rasters.
    pub max_dimension: usize,
    /// Maximum keypoints per image.
    pub max_features: usize,
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Maximum pyramid levels.
    pub pyramid_levels: usize,
    /// Downscale factor between pyramid levels.
    pub scale_factor: f32,
    /// Scan query descriptors in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let extractor = ExtractorConfig::default();
        Self {
            default_threshold: DEFAULT_THRESHOLD,
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_features: extractor.max_features,
            fast_threshold: extractor.fast_threshold,
            pyramid_levels: extractor.pyramid_levels,
            scale_factor: extractor.scale_factor,
            parallel: false,
        }
    }
}

impl EngineConfig {
    /// Checks every field against its allowed range.
    pub fn validate(&self) -> RefMatchResult<()> {
        if !(0.0..=1.0).contains(&self.default_threshold) {
            return Err(RefMatchError::InvalidConfig {
                reason: "default_threshold must be in 0.0-1.0",
            });
        }
        if self.max_dimension == 0 {
            return Err(RefMatchError::InvalidConfig {
                reason: "max_dimension must be >= 1",
            });
        }
        self.extractor_config().validate()
    }

    /// Returns the preprocessor view of this configuration.
    pub fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig {
            max_dimension: self.max_dimension,
        }
    }

    /// Returns the extractor view of this configuration.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            max_features: self.max_features,
            fast_threshold: self.fast_threshold,
            pyramid_levels: self.pyramid_levels,
            scale_factor: self.scale_factor,
        }
    }
}
