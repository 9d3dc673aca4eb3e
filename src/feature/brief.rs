//! Rotated BRIEF descriptor: 256 intensity comparisons over a fixed
//! point-pair pattern, steered by the keypoint orientation.
//!
//! The pattern is drawn once from an isotropic Gaussian (sigma = 31 / 5)
//! with a fixed-seed ChaCha stream and clipped to
//! `[-PATTERN_RADIUS, PATTERN_RADIUS]`, so descriptors are reproducible
//! across runs and processes.

use crate::descriptor::DESCRIPTOR_BYTES;
use crate::image::{ImageView, RasterImage};
use crate::util::math::{round_offset, sin_cos};
use ::image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use std::sync::OnceLock;

const PATTERN_BITS: usize = DESCRIPTOR_BYTES * 8;
const PATTERN_SEED: u64 = 0x0b1e_f5ee_d256_0031;
const PATTERN_SIGMA: f64 = 31.0 / 5.0;
pub(crate) const PATTERN_RADIUS: i8 = 13;

/// Margin needed around a keypoint so every rotated sample stays in bounds.
pub(crate) const PATTERN_MARGIN: usize = 19;

/// Gaussian sigma of the pre-description blur.
const SMOOTH_SIGMA: f32 = 2.0;

#[derive(Clone, Copy, Debug)]
struct PointPair {
    a: (f32, f32),
    b: (f32, f32),
}

fn sample_coord(rng: &mut ChaCha8Rng) -> i8 {
    let z: f64 = StandardNormal.sample(rng);
    let radius = f64::from(PATTERN_RADIUS);
    (z * PATTERN_SIGMA).round().clamp(-radius, radius) as i8
}

fn sample_point(rng: &mut ChaCha8Rng) -> (i8, i8) {
    (sample_coord(rng), sample_coord(rng))
}

fn pattern() -> &'static [PointPair] {
    static PATTERN: OnceLock<Vec<PointPair>> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut rng = ChaCha8Rng::seed_from_u64(PATTERN_SEED);
        let mut pairs = Vec::with_capacity(PATTERN_BITS);
        while pairs.len() < PATTERN_BITS {
            let a = sample_point(&mut rng);
            let b = sample_point(&mut rng);
            if a == b {
                continue;
            }
            pairs.push(PointPair {
                a: (f32::from(a.0), f32::from(a.1)),
                b: (f32::from(b.0), f32::from(b.1)),
            });
        }
        pairs
    })
}

/// Gaussian-smooths a pyramid level before sampling.
pub(crate) fn smooth(level: &GrayImage) -> RasterImage {
    RasterImage::from_gray_image(gaussian_blur_f32(level, SMOOTH_SIGMA))
}

/// Computes the steered descriptor at `(x, y)` of a smoothed level.
///
/// The keypoint must be at least `PATTERN_MARGIN` pixels from every edge.
pub(crate) fn describe(
    smoothed: ImageView<'_, u8>,
    x: usize,
    y: usize,
    angle_rad: f32,
) -> [u8; DESCRIPTOR_BYTES] {
    debug_assert!(x >= PATTERN_MARGIN && x + PATTERN_MARGIN < smoothed.width());
    debug_assert!(y >= PATTERN_MARGIN && y + PATTERN_MARGIN < smoothed.height());
    let (sin_a, cos_a) = sin_cos(angle_rad);
    let steer = |(px, py): (f32, f32)| -> (isize, isize) {
        (
            round_offset(cos_a * px - sin_a * py),
            round_offset(sin_a * px + cos_a * py),
        )
    };

    let mut out = [0u8; DESCRIPTOR_BYTES];
    for (bit, pair) in pattern().iter().enumerate() {
        let (ax, ay) = steer(pair.a);
        let (bx, by) = steer(pair.b);
        let a = smoothed.at_offset(x, y, ax, ay);
        let b = smoothed.at_offset(x, y, bx, by);
        if a < b {
            out[bit / 8] |= 1 << (bit % 8);
        }
    }
    out
}
