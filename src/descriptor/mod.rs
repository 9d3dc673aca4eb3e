//! Binary descriptor storage.
//!
//! A `DescriptorSet` stores fixed-width binary rows contiguously. The width is
//! an explicit part of the shape and survives when the set is empty, so two
//! sets can always be checked for compatibility before comparison.

use crate::util::{RefMatchError, RefMatchResult};

/// Canonical descriptor width in bytes (256 bits).
pub const DESCRIPTOR_BYTES: usize = 32;

/// Ordered set of equal-width binary descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorSet {
    data: Vec<u8>,
    width: usize,
}

impl Default for DescriptorSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl DescriptorSet {
    /// Creates an empty set with the canonical width.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            width: DESCRIPTOR_BYTES,
        }
    }

    /// Creates a set from contiguous row-major storage.
    ///
    /// `data.len()` must be a multiple of `width`, and `width` must be non-zero.
    pub fn from_raw(data: Vec<u8>, width: usize) -> RefMatchResult<Self> {
        if width == 0 || data.len() % width != 0 {
            return Err(RefMatchError::InvalidDescriptorData {
                len: data.len(),
                width,
            });
        }
        Ok(Self { data, width })
    }

    /// Creates a canonical-width set from 32-byte rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = [u8; DESCRIPTOR_BYTES]>,
    {
        let data = rows.into_iter().flatten().collect();
        Self {
            data,
            width: DESCRIPTOR_BYTES,
        }
    }

    /// Returns the row width in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of descriptors.
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    /// Returns true if the set holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns descriptor `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.width)?;
        self.data.get(start..start.checked_add(self.width)?)
    }

    /// Iterates over descriptors in order.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.width)
    }

    /// Returns the contiguous storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Fails unless `other` shares this set's width.
    pub fn ensure_same_width(&self, other: &DescriptorSet) -> RefMatchResult<()> {
        if self.width != other.width {
            return Err(RefMatchError::DescriptorWidthMismatch {
                left: self.width,
                right: other.width,
            });
        }
        Ok(())
    }
}
