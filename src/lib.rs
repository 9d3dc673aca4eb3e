//! refmatch decides whether an image matches any image in a reference set.
//!
//! Query bytes are decoded into a bounded grayscale raster, described with
//! ORB-style binary features, and matched against every reference with a
//! brute-force Hamming ratio test. The best per-reference score is compared
//! against a threshold. Reference sets are immutable snapshots that can be
//! swapped atomically while recognition runs, with optional parallelism via
//! the `rayon` feature.

mod candidate;
pub mod descriptor;
pub mod engine;
pub mod feature;
pub mod image;
pub mod index;
pub mod kernel;
pub mod matcher;
pub mod trace;
pub mod util;

pub use crate::image::preprocess::{PreprocessConfig, Preprocessor};
pub use crate::image::pyramid::ImagePyramid;
pub use crate::image::{ImageView, RasterImage};
pub use descriptor::{DescriptorSet, DESCRIPTOR_BYTES};
pub use engine::{
    EngineConfig, RecognitionEngine, RecognitionResult, RecognizeOptions, DEFAULT_THRESHOLD,
};
pub use feature::{ExtractorConfig, FeatureExtractor, Keypoint};
pub use index::{
    category_for_key, Metadata, ReferenceEntry, ReferenceImage, ReferenceIndex, SharedIndex,
};
pub use matcher::{similarity, DescriptorMatcher};
pub use trace::{Event, EventSink, NoopSink};
#[cfg(feature = "tracing")]
pub use trace::TracingSink;
pub use util::{RefMatchError, RefMatchResult};
