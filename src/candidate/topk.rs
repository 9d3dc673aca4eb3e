//! Top-K tracking of corner candidates by response strength.

use std::cmp::Ordering;

/// Corner candidate on a specific pyramid level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    /// X coordinate (column) in level pixels.
    pub x: usize,
    /// Y coordinate (row) in level pixels.
    pub y: usize,
    /// Pyramid level index.
    pub level: usize,
    /// Harris response at the corner.
    pub response: f32,
}

pub(crate) fn corner_cmp_desc(a: &Corner, b: &Corner) -> Ordering {
    b.response
        .total_cmp(&a.response)
        .then_with(|| a.level.cmp(&b.level))
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts corners by descending response with deterministic tie-breaking.
pub(crate) fn sort_corners_desc(corners: &mut [Corner]) {
    corners.sort_by(corner_cmp_desc);
}

/// Top-K container that compacts its buffer once it holds `2k` items.
pub struct TopK<T> {
    k: usize,
    items: Vec<T>,
}

impl TopK<Corner> {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::new(),
        }
    }

    /// Pushes a corner, compacting to the best `k` when the buffer is full.
    pub fn push(&mut self, corner: Corner) {
        if self.k == 0 {
            return;
        }
        self.items.push(corner);
        if self.items.len() >= self.k.saturating_mul(2) {
            self.compact();
        }
    }

    fn compact(&mut self) {
        sort_corners_desc(&mut self.items);
        self.items.truncate(self.k);
    }

    /// Returns at most `k` corners sorted by descending response.
    pub fn into_sorted_desc(mut self) -> Vec<Corner> {
        self.compact();
        self.items
    }
}
