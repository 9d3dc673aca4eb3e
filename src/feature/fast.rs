//! FAST-9 corner candidates and Harris corner response.

use crate::image::ImageView;
use ::image::GrayImage;
use imageproc::corners::{corners_fast9, Corner};

const HARRIS_K: f32 = 0.04;
const HARRIS_RADIUS: isize = 3;

/// Detects FAST-9 corners at least `border` pixels from every edge.
///
/// Corners come back in raster order.
pub(crate) fn detect(image: &GrayImage, threshold: u8, border: usize) -> Vec<(usize, usize)> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    if width <= 2 * border || height <= 2 * border {
        return Vec::new();
    }
    let mut corners: Vec<(usize, usize)> = corners_fast9(image, threshold)
        .into_iter()
        .map(|Corner { x, y, .. }| (x as usize, y as usize))
        .filter(|&(x, y)| {
            x >= border && y >= border && x < width - border && y < height - border
        })
        .collect();
    corners.sort_unstable_by_key(|&(x, y)| (y, x));
    corners
}

/// Harris response over a 7x7 block using central-difference gradients.
///
/// The pixel must be at least 4 pixels away from every edge.
pub(crate) fn harris_response(image: ImageView<'_, u8>, x: usize, y: usize) -> f32 {
    let mut sxx = 0.0f32;
    let mut syy = 0.0f32;
    let mut sxy = 0.0f32;
    for dy in -HARRIS_RADIUS..=HARRIS_RADIUS {
        for dx in -HARRIS_RADIUS..=HARRIS_RADIUS {
            let px = (x as isize + dx) as usize;
            let py = (y as isize + dy) as usize;
            let gx = (f32::from(image.at(px + 1, py)) - f32::from(image.at(px - 1, py))) / 255.0;
            let gy = (f32::from(image.at(px, py + 1)) - f32::from(image.at(px, py - 1))) / 255.0;
            sxx += gx * gx;
            syy += gy * gy;
            sxy += gx * gy;
        }
    }
    let trace = sxx + syy;
    sxx * syy - sxy * sxy - HARRIS_K * trace * trace
}
