//! Intensity-centroid orientation of a circular patch.

use crate::image::ImageView;
use crate::util::math::wrap_rad;
use std::sync::OnceLock;

/// Radius of the circular patch used for orientation.
pub(crate) const HALF_PATCH: usize = 15;

/// Half-widths of the circular patch per row offset `0..=HALF_PATCH`.
fn row_extents() -> &'static [usize; HALF_PATCH + 1] {
    static EXTENTS: OnceLock<[usize; HALF_PATCH + 1]> = OnceLock::new();
    EXTENTS.get_or_init(|| {
        let r2 = (HALF_PATCH * HALF_PATCH) as f32;
        let mut out = [0usize; HALF_PATCH + 1];
        for (v, extent) in out.iter_mut().enumerate() {
            *extent = (r2 - (v * v) as f32).sqrt().round() as usize;
        }
        out
    })
}

/// Returns the angle in `[0, 2*pi)` from `(x, y)` to the patch's intensity
/// centroid.
///
/// The pixel must be at least `HALF_PATCH` pixels away from every edge.
pub(crate) fn intensity_centroid_angle(image: ImageView<'_, u8>, x: usize, y: usize) -> f32 {
    let extents = row_extents();
    let radius = HALF_PATCH as isize;
    let mut m10 = 0i64;
    let mut m01 = 0i64;
    for v in -radius..=radius {
        let extent = extents[v.unsigned_abs()] as isize;
        for u in -extent..=extent {
            let value = i64::from(image.at_offset(x, y, u, v));
            m10 += u as i64 * value;
            m01 += v as i64 * value;
        }
    }
    wrap_rad((m01 as f32).atan2(m10 as f32))
}
