//! Precomputed reference descriptors.
//!
//! A `ReferenceIndex` is built once from fully described entries and never
//! mutated afterwards. Replacing the reference set means building a new index
//! and publishing it through [`SharedIndex`].

mod shared;

pub use shared::SharedIndex;

use crate::descriptor::DescriptorSet;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Category assigned to keys without a `/`-separated group.
pub const DEFAULT_CATEGORY: &str = "default";

/// Opaque string metadata carried alongside a reference.
pub type Metadata = BTreeMap<String, String>;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Derives a category from a storage key: the first `/`-separated segment,
/// or [`DEFAULT_CATEGORY`] for keys without a separator.
pub fn category_for_key(key: &str) -> &str {
    match key.split_once('/') {
        Some((group, _)) => group,
        None => DEFAULT_CATEGORY,
    }
}

/// Raw reference image as supplied by a loader.
#[derive(Clone, Debug)]
pub struct ReferenceImage {
    /// Provenance key, unique within a batch.
    pub id: String,
    /// Category label.
    pub category: String,
    /// Compressed image bytes.
    pub bytes: Vec<u8>,
    /// Loader-supplied metadata.
    pub metadata: Metadata,
}

impl ReferenceImage {
    /// Creates a reference from a storage key and its bytes.
    ///
    /// The key becomes the id, the category follows [`category_for_key`], and
    /// the metadata records `key` and `size`.
    pub fn from_key(key: impl Into<String>, bytes: Vec<u8>) -> Self {
        let id = key.into();
        let category = category_for_key(&id).to_string();
        let mut metadata = Metadata::new();
        metadata.insert("key".to_string(), id.clone());
        metadata.insert("size".to_string(), bytes.len().to_string());
        Self {
            id,
            category,
            bytes,
            metadata,
        }
    }
}

/// One described reference image.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceEntry {
    id: String,
    category: String,
    descriptors: DescriptorSet,
    metadata: Metadata,
}

impl ReferenceEntry {
    /// Creates an entry with empty metadata.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        descriptors: DescriptorSet,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            descriptors,
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replaces the metadata map.
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the provenance key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the precomputed descriptors.
    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Immutable, ordered collection of reference entries.
#[derive(Debug)]
pub struct ReferenceIndex {
    entries: Vec<ReferenceEntry>,
    generation: u64,
}

impl Default for ReferenceIndex {
    fn default() -> Self {
        Self::build(Vec::new())
    }
}

impl ReferenceIndex {
    /// Builds an index from fully described entries, keeping their order.
    ///
    /// Every index receives a distinct, increasing generation number.
    pub fn build(entries: Vec<ReferenceEntry>) -> Self {
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        Self {
            entries,
            generation,
        }
    }

    /// Returns the entries in insertion order.
    pub fn all(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the generation number assigned at build time.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{category_for_key, ReferenceImage, ReferenceIndex};

    #[test]
    fn category_follows_first_path_segment() {
        assert_eq!(category_for_key("cats/001.jpg"), "cats");
        assert_eq!(category_for_key("cats/indoor/002.png"), "cats");
        assert_eq!(category_for_key("top.png"), "default");
    }

    #[test]
    fn from_key_records_provenance() {
        let image = ReferenceImage::from_key("logos/a.png", vec![1, 2, 3]);
        assert_eq!(image.id, "logos/a.png");
        assert_eq!(image.category, "logos");
        assert_eq!(image.metadata.get("size").map(String::as_str), Some("3"));
        assert_eq!(image.metadata.get("key").map(String::as_str), Some("logos/a.png"));
    }

    #[test]
    fn generations_increase() {
        let a = ReferenceIndex::build(Vec::new());
        let b = ReferenceIndex::build(Vec::new());
        assert!(b.generation() > a.generation());
        assert!(a.is_empty());
    }
}
