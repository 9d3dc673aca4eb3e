//! Numeric helpers shared by the extractor and matcher.

/// Clamps a score into `[0, 1]`, mapping non-finite values to zero.
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rounds a float coordinate to the nearest integer offset.
#[inline]
pub(crate) fn round_offset(value: f32) -> isize {
    value.round() as isize
}

/// Splits a `[0, 2*pi)` angle in radians into `(sin, cos)`.
#[inline]
pub(crate) fn sin_cos(angle_rad: f32) -> (f32, f32) {
    angle_rad.sin_cos()
}

/// Wraps an angle in radians to `[0, 2*pi)`.
pub(crate) fn wrap_rad(angle_rad: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let wrapped = angle_rad % tau;
    if wrapped < 0.0 {
        wrapped + tau
    } else {
        wrapped
    }
}
