//! Rayon-parallel kernel (feature-gated).
//!
//! Query rows are distributed across the global pool; each row's
//! neighbour search is independent, so the count equals the scalar kernel's.

use crate::descriptor::DescriptorSet;
use crate::kernel::{knn2, passes_ratio, Kernel};
use rayon::prelude::*;

/// Row-parallel exhaustive matcher.
pub struct RayonKernel;

impl Kernel for RayonKernel {
    fn count_good_matches(query: &DescriptorSet, train: &DescriptorSet) -> usize {
        query
            .as_bytes()
            .par_chunks_exact(query.width())
            .filter_map(|row| knn2(row, train))
            .filter(|&(best, second)| passes_ratio(best, second))
            .count()
    }
}
