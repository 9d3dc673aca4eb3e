//! Atomically published reference snapshots.
//!
//! The lock only guards the `Arc` pointer. Readers clone the current `Arc`
//! and release the lock before matching; reloads build the replacement index
//! outside the lock and take it only to swap pointers. A reader therefore
//! sees either the old or the new index in full, never a mixture.

use crate::index::ReferenceIndex;
use crate::util::RefMatchResult;
use std::sync::{Arc, PoisonError, RwLock};

/// Holder of the currently published reference index.
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<ReferenceIndex>>,
}

impl SharedIndex {
    /// Publishes `index` as the initial snapshot.
    pub fn new(index: ReferenceIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<ReferenceIndex> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Publishes `index` and returns the snapshot it replaced.
    pub fn publish(&self, index: ReferenceIndex) -> Arc<ReferenceIndex> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Builds a new index with `build` and publishes it on success.
    ///
    /// On failure the previous snapshot stays published. Returns the newly
    /// published snapshot.
    pub fn reload<F>(&self, build: F) -> RefMatchResult<Arc<ReferenceIndex>>
    where
        F: FnOnce() -> RefMatchResult<ReferenceIndex>,
    {
        let next = Arc::new(build()?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        Ok(next)
    }
}
