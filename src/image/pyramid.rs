//! Scale pyramid construction for grayscale rasters.
//!
//! Level `i` has the base size divided by `scale_factor^i` (rounded). Each
//! level is area-resampled from the one above it, so detail is averaged
//! rather than dropped when shrinking by non-integer factors.

use crate::image::resize::resize_area;
use crate::image::{ImageView, RasterImage};

/// One pyramid level and its scale relative to the base raster.
pub struct PyramidLevel {
    image: RasterImage,
    scale: f32,
}

impl PyramidLevel {
    /// Returns a view of the level raster.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.image.view()
    }

    /// Returns the level raster.
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    /// Returns the factor mapping level coordinates to base coordinates.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Owned image pyramid built from a base level.
pub struct ImagePyramid {
    levels: Vec<PyramidLevel>,
}

impl ImagePyramid {
    /// Builds a pyramid from a base raster.
    ///
    /// Levels whose width or height would fall below `min_side` are not
    /// built, including the base level, so the pyramid may be empty for tiny
    /// rasters. `max_levels` is clamped to at least 1.
    pub fn build(
        base: &RasterImage,
        max_levels: usize,
        scale_factor: f32,
        min_side: usize,
    ) -> Self {
        let max_levels = max_levels.max(1);
        let mut levels: Vec<PyramidLevel> = Vec::with_capacity(max_levels);
        if base.width() < min_side || base.height() < min_side {
            return Self { levels };
        }
        levels.push(PyramidLevel {
            image: base.clone(),
            scale: 1.0,
        });

        for idx in 1..max_levels {
            let scale = scale_factor.powi(idx as i32);
            let width = (base.width() as f32 / scale).round() as usize;
            let height = (base.height() as f32 / scale).round() as usize;
            if width < min_side || height < min_side {
                break;
            }
            let Some(prev) = levels.last() else {
                break;
            };
            let src = &prev.image;
            if width >= src.width() && height >= src.height() {
                break;
            }
            let data = resize_area(src.data(), src.width(), src.height(), 1, width, height);
            levels.push(PyramidLevel {
                image: RasterImage {
                    data,
                    width,
                    height,
                },
                scale,
            });
        }

        Self { levels }
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|level| level.view())
    }

    /// Returns the number of built levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if no level could be built.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
