//! Area-averaging resampling for interleaved `u8` buffers.
//!
//! Each destination sample is the mean of the source samples it covers,
//! weighted by the fractional overlap of the source pixel with the destination
//! footprint. The filter is separable: rows are resampled first into an `f32`
//! scratch buffer, then columns, with a single rounding at the end.

/// Per-axis contributions: `(source index, weight)` lists per destination index.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            let mut taps = Vec::with_capacity(last.saturating_sub(first));
            for s in first..last {
                let overlap = end.min((s + 1) as f64) - start.max(s as f64);
                if overlap > 1e-9 {
                    taps.push((s, (overlap / (end - start)) as f32));
                }
            }
            taps
        })
        .collect()
}

/// Resamples an interleaved `channels`-channel buffer to `dst_width x dst_height`.
///
/// Intended for shrinking; callers never request a larger destination.
pub(crate) fn resize_area(
    src: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    dst_width: usize,
    dst_height: usize,
) -> Vec<u8> {
    debug_assert_eq!(src.len(), width * height * channels);
    if dst_width == width && dst_height == height {
        return src.to_vec();
    }

    let wx = area_weights(width, dst_width);
    let wy = area_weights(height, dst_height);

    let mut horizontal = vec![0.0f32; height * dst_width * channels];
    for y in 0..height {
        let src_row = &src[y * width * channels..(y + 1) * width * channels];
        let dst_row = &mut horizontal[y * dst_width * channels..(y + 1) * dst_width * channels];
        for (dx, taps) in wx.iter().enumerate() {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for &(sx, w) in taps {
                    acc += f32::from(src_row[sx * channels + c]) * w;
                }
                dst_row[dx * channels + c] = acc;
            }
        }
    }

    let row_len = dst_width * channels;
    let mut out = vec![0u8; dst_height * row_len];
    for (dy, taps) in wy.iter().enumerate() {
        let dst_row = &mut out[dy * row_len..(dy + 1) * row_len];
        for (i, value) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for &(sy, w) in taps {
                acc += horizontal[sy * row_len + i] * w;
            }
            *value = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
