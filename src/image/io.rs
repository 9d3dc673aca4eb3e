//! Decoding of compressed image bytes via the `image` crate.

use crate::util::{RefMatchError, RefMatchResult};

/// Decodes compressed bytes (PNG, JPEG, BMP, WebP) into an 8-bit RGB buffer.
pub(crate) fn decode_rgb(bytes: &[u8]) -> RefMatchResult<::image::RgbImage> {
    if bytes.is_empty() {
        return Err(RefMatchError::image_format("empty image data"));
    }
    let img = ::image::load_from_memory(bytes).map_err(|err| {
        RefMatchError::image_format(format!("decode failed or unsupported format: {err}"))
    })?;
    if img.width() == 0 || img.height() == 0 {
        return Err(RefMatchError::image_format(
            "decode failed or unsupported format: zero-sized image",
        ));
    }
    Ok(img.to_rgb8())
}

/// Converts an interleaved RGB buffer to grayscale with BT.601 weights.
pub(crate) fn rgb_to_luma(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .map(|px| {
            let r = u32::from(px[0]);
            let g = u32::from(px[1]);
            let b = u32::from(px[2]);
            ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8
        })
        .collect()
}
