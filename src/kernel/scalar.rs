//! Sequential brute-force kernel.

use crate::descriptor::DescriptorSet;
use crate::kernel::{knn2, passes_ratio, Kernel};

/// Single-threaded exhaustive matcher.
pub struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn count_good_matches(query: &DescriptorSet, train: &DescriptorSet) -> usize {
        query
            .rows()
            .filter_map(|row| knn2(row, train))
            .filter(|&(best, second)| passes_ratio(best, second))
            .count()
    }
}
