//! Grayscale rasters, borrowed views, and decoding/normalization.
//!
//! `RasterImage` is the owned, contiguous single-channel raster produced by
//! the preprocessor and the pyramid. `ImageView` borrows one for the
//! per-pixel kernels of the extractor.

use crate::util::{RefMatchError, RefMatchResult};
use ::image::{GrayImage, Luma};

pub(crate) mod io;
pub mod preprocess;
pub mod pyramid;
pub(crate) mod resize;

/// Borrowed, contiguous row-major 2D image view.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
}

impl<'a, T: Copy> ImageView<'a, T> {
    /// Creates a view over `width * height` row-major samples.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> RefMatchResult<Self> {
        let needed = required_len(width, height)?;
        if data.len() < needed {
            return Err(RefMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads a pixel the caller has already bounds-checked against the border.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// Reads a pixel at a signed offset from `(x, y)`.
    #[inline]
    pub(crate) fn at_offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> T {
        let px = (x as isize + dx) as usize;
        let py = (y as isize + dy) as usize;
        self.at(px, py)
    }
}

/// Owned contiguous grayscale raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RasterImage {
    /// Creates a raster from a contiguous row-major buffer of exactly
    /// `width * height` samples.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> RefMatchResult<Self> {
        let needed = required_len(width, height)?;
        if data.len() < needed {
            return Err(RefMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(RefMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps a buffer whose shape the caller has already established.
    pub(crate) fn from_parts(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Takes ownership of an `image` buffer.
    pub(crate) fn from_gray_image(img: GrayImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self::from_parts(img.into_raw(), width, height)
    }

    /// Copies the raster into an `image` buffer for `imageproc` filters.
    pub(crate) fn to_gray_image(&self) -> GrayImage {
        let width = self.width;
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.data[y as usize * width + x as usize]])
        })
    }

    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major sample buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn required_len(width: usize, height: usize) -> RefMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(RefMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(RefMatchError::InvalidDimensions { width, height })
}
