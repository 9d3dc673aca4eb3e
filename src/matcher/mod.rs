//! Similarity scoring between descriptor sets.
//!
//! For every descriptor of the query set the two nearest train descriptors
//! are found by exhaustive Hamming search. A match is good when the nearest
//! distance is strictly below `RATIO_TEST` times the second nearest. The
//! score is `good / max(|query|, |train|)`, clamped to `[0, 1]`. Matching is
//! one-directional; there is no cross-check.

use crate::descriptor::DescriptorSet;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::RayonKernel;
use crate::kernel::scalar::ScalarKernel;
use crate::kernel::Kernel;
use crate::util::math::clamp_unit;
use crate::util::RefMatchResult;

/// Scores descriptor sets against each other.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptorMatcher {
    parallel: bool,
}

impl DescriptorMatcher {
    /// Creates a sequential matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables row-parallel scanning when the `rayon` feature is compiled in.
    ///
    /// Without the feature the flag is ignored.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns true if parallel scanning is requested.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the similarity of `query` to `train` in `[0, 1]`.
    ///
    /// Sets of different widths are rejected; if either set is empty the
    /// score is exactly `0.0`.
    pub fn similarity(&self, query: &DescriptorSet, train: &DescriptorSet) -> RefMatchResult<f32> {
        query.ensure_same_width(train)?;
        if query.is_empty() || train.is_empty() {
            return Ok(0.0);
        }

        let good = self.count_good_matches(query, train);
        let denom = query.len().max(train.len());
        Ok(clamp_unit(good as f32 / denom as f32))
    }

    #[cfg(feature = "rayon")]
    fn count_good_matches(&self, query: &DescriptorSet, train: &DescriptorSet) -> usize {
        if self.parallel {
            <RayonKernel as Kernel>::count_good_matches(query, train)
        } else {
            <ScalarKernel as Kernel>::count_good_matches(query, train)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn count_good_matches(&self, query: &DescriptorSet, train: &DescriptorSet) -> usize {
        <ScalarKernel as Kernel>::count_good_matches(query, train)
    }
}

/// Sequential similarity with the default matcher.
pub fn similarity(query: &DescriptorSet, train: &DescriptorSet) -> RefMatchResult<f32> {
    DescriptorMatcher::new().similarity(query, train)
}
