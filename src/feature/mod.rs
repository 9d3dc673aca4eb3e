//! Keypoint detection and binary descriptor extraction.
//!
//! The extractor follows the ORB recipe: FAST-9 corners (via `imageproc`) on
//! every level of a scale pyramid, Harris-ranked and capped globally, oriented
//! by the patch intensity centroid, and described with a steered BRIEF
//! pattern on a Gaussian-blurred level. The
//! output is deterministic for a given raster and configuration.

mod brief;
mod fast;
mod orient;

use crate::candidate::nms::suppress_non_maxima;
use crate::candidate::topk::{Corner, TopK};
use crate::descriptor::{DescriptorSet, DESCRIPTOR_BYTES};
use crate::image::pyramid::ImagePyramid;
use crate::image::RasterImage;
use crate::trace::{trace_event, trace_span};
use crate::util::{RefMatchError, RefMatchResult};
use ::image::GrayImage;

/// Distance from the level edge inside which no keypoint is placed.
///
/// Covers the orientation patch and the steered sampling pattern.
pub const EDGE_BORDER: usize = 20;

/// Configuration for feature extraction.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    /// Maximum number of keypoints retained across all levels.
    pub max_features: usize,
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Maximum number of pyramid levels.
    pub pyramid_levels: usize,
    /// Downscale factor between consecutive levels.
    pub scale_factor: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            fast_threshold: 20,
            pyramid_levels: 8,
            scale_factor: 1.2,
        }
    }
}

impl ExtractorConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> RefMatchResult<()> {
        if self.fast_threshold == 0 || self.fast_threshold == u8::MAX {
            return Err(RefMatchError::InvalidConfig {
                reason: "fast_threshold must be in 1..=254",
            });
        }
        if self.pyramid_levels == 0 {
            return Err(RefMatchError::InvalidConfig {
                reason: "pyramid_levels must be >= 1",
            });
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(RefMatchError::InvalidConfig {
                reason: "scale_factor must be finite and > 1",
            });
        }
        Ok(())
    }
}

/// A detected keypoint in base-raster coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// X coordinate in base-raster pixels.
    pub x: f32,
    /// Y coordinate in base-raster pixels.
    pub y: f32,
    /// Pyramid level the keypoint was detected on.
    pub level: usize,
    /// Harris response used for ranking.
    pub response: f32,
    /// Dominant orientation in radians, once assigned.
    pub angle: Option<f32>,
}

/// ORB-style keypoint detector and descriptor extractor.
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    cfg: ExtractorConfig,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            cfg: ExtractorConfig::default(),
        }
    }
}

impl FeatureExtractor {
    /// Creates an extractor after validating `cfg`.
    pub fn new(cfg: ExtractorConfig) -> RefMatchResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.cfg
    }

    /// Extracts the descriptor set of `raster`.
    ///
    /// A raster without detectable corners yields an empty set of canonical
    /// width.
    pub fn extract(&self, raster: &RasterImage) -> DescriptorSet {
        self.detect_and_compute(raster).1
    }

    /// Detects keypoints and computes one descriptor per keypoint.
    ///
    /// Keypoints are returned in descending response order, aligned with the
    /// descriptor rows.
    pub fn detect_and_compute(&self, raster: &RasterImage) -> (Vec<Keypoint>, DescriptorSet) {
        let _span = trace_span!(
            "extract",
            width = raster.width(),
            height = raster.height()
        )
        .entered();

        let min_side = 2 * EDGE_BORDER + 1;
        let pyramid = ImagePyramid::build(
            raster,
            self.cfg.pyramid_levels,
            self.cfg.scale_factor,
            min_side,
        );

        let mut topk = TopK::new(self.cfg.max_features);
        let grays: Vec<GrayImage> = pyramid
            .levels()
            .iter()
            .map(|level| level.image().to_gray_image())
            .collect();
        for (level_idx, (level, gray)) in pyramid.levels().iter().zip(&grays).enumerate() {
            let view = level.view();
            let scored: Vec<Corner> = fast::detect(gray, self.cfg.fast_threshold, EDGE_BORDER)
                .into_iter()
                .map(|(x, y)| Corner {
                    x,
                    y,
                    level: level_idx,
                    response: fast::harris_response(view, x, y),
                })
                .collect();
            for corner in suppress_non_maxima(&scored, view.width(), view.height()) {
                topk.push(corner);
            }
        }
        let selected = topk.into_sorted_desc();
        if selected.is_empty() {
            trace_event!("extracted", keypoints = 0usize, levels = pyramid.len());
            return (Vec::new(), DescriptorSet::empty());
        }

        let mut smoothed: Vec<Option<RasterImage>> = vec![None; pyramid.len()];
        let mut keypoints = Vec::with_capacity(selected.len());
        let mut rows: Vec<[u8; DESCRIPTOR_BYTES]> = Vec::with_capacity(selected.len());
        for corner in selected {
            let level = &pyramid.levels()[corner.level];
            let angle = orient::intensity_centroid_angle(level.view(), corner.x, corner.y);
            let blurred =
                smoothed[corner.level].get_or_insert_with(|| brief::smooth(&grays[corner.level]));
            rows.push(brief::describe(blurred.view(), corner.x, corner.y, angle));
            keypoints.push(Keypoint {
                x: corner.x as f32 * level.scale(),
                y: corner.y as f32 * level.scale(),
                level: corner.level,
                response: corner.response,
                angle: Some(angle),
            });
        }

        trace_event!(
            "extracted",
            keypoints = keypoints.len(),
            levels = pyramid.len()
        );
        (keypoints, DescriptorSet::from_rows(rows))
    }
}
