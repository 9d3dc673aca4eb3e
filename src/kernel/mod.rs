//! Hamming-distance kernels for brute-force descriptor matching.

use crate::descriptor::DescriptorSet;

/// Nearest/second-nearest distance ratio a match must beat to count as good.
pub const RATIO_TEST: f32 = 0.75;

/// Counts differing bits between two equal-length byte slices.
#[inline]
pub fn hamming(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    let mut chunks_a = a.chunks_exact(8);
    let mut chunks_b = b.chunks_exact(8);
    let mut dist = 0u32;
    for (ca, cb) in (&mut chunks_a).zip(&mut chunks_b) {
        let mut wa = [0u8; 8];
        let mut wb = [0u8; 8];
        wa.copy_from_slice(ca);
        wb.copy_from_slice(cb);
        dist += (u64::from_le_bytes(wa) ^ u64::from_le_bytes(wb)).count_ones();
    }
    for (x, y) in chunks_a.remainder().iter().zip(chunks_b.remainder()) {
        dist += (x ^ y).count_ones();
    }
    dist
}

/// Returns the nearest and second-nearest Hamming distances from `query` to
/// the rows of `train`, or `None` when `train` has fewer than two rows.
pub fn knn2(query: &[u8], train: &DescriptorSet) -> Option<(u32, u32)> {
    if train.len() < 2 {
        return None;
    }
    let mut best = u32::MAX;
    let mut second = u32::MAX;
    for row in train.rows() {
        let dist = hamming(query, row);
        if dist < best {
            second = best;
            best = dist;
        } else if dist < second {
            second = dist;
        }
    }
    Some((best, second))
}

/// Ratio test: the nearest distance must be strictly below
/// `RATIO_TEST * second`.
#[inline]
pub(crate) fn passes_ratio(best: u32, second: u32) -> bool {
    (best as f32) < RATIO_TEST * second as f32
}

/// Kernel trait for counting ratio-test survivors of `query` against `train`.
///
/// Both sets must share a width; callers check this before dispatching.
pub trait Kernel {
    /// Counts query rows whose nearest neighbour in `train` passes the ratio test.
    fn count_good_matches(query: &DescriptorSet, train: &DescriptorSet) -> usize;
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(test)]
mod tests {
    use super::{hamming, knn2, passes_ratio};
    use crate::descriptor::DescriptorSet;

    #[test]
    fn hamming_counts_bits_across_words_and_tail() {
        let a = [0u8; 11];
        let mut b = [0u8; 11];
        b[0] = 0b1011;
        b[7] = 0xff;
        b[10] = 0b1;
        assert_eq!(hamming(&a, &b), 3 + 8 + 1);
        assert_eq!(hamming(&b, &b), 0);
    }

    #[test]
    fn knn2_requires_two_candidates() {
        let train = DescriptorSet::from_rows([[0u8; 32]]);
        assert!(knn2(&[0u8; 32], &train).is_none());
    }

    #[test]
    fn knn2_tracks_two_smallest() {
        let mut far = [0u8; 32];
        far[..4].copy_from_slice(&[0xff; 4]);
        let mut near = [0u8; 32];
        near[0] = 0b1;
        let train = DescriptorSet::from_rows([far, [0xffu8; 32], near]);
        assert_eq!(knn2(&[0u8; 32], &train), Some((1, 32)));
    }

    #[test]
    fn ratio_is_strict() {
        assert!(passes_ratio(2, 4));
        assert!(!passes_ratio(3, 4));
        assert!(!passes_ratio(0, 0));
    }
}
