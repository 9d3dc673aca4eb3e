//! Recognition pipeline: normalize, extract, match against every reference,
//! and decide against a threshold.
//!
//! `recognize` only returns `Err` for an invalid threshold, which is checked
//! before any decoding. Every other failure becomes data: a
//! [`RecognitionResult`] with a zero score, no match, and a message.

mod config;

pub use config::{EngineConfig, DEFAULT_THRESHOLD};

use crate::descriptor::DescriptorSet;
use crate::feature::FeatureExtractor;
use crate::image::preprocess::Preprocessor;
use crate::index::{ReferenceEntry, ReferenceImage, ReferenceIndex, SharedIndex};
use crate::matcher::DescriptorMatcher;
use crate::trace::{trace_span, Event, EventSink, NoopSink};
use crate::util::{RefMatchError, RefMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one recognition call.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionResult {
    /// True if the best score reached the threshold.
    pub is_match: bool,
    /// Best similarity over all references, in `[0, 1]`.
    pub similarity_score: f32,
    /// Time from the start of preprocessing to the result.
    pub processing_time: Duration,
    /// Failure description for rejected images and internal errors.
    pub error_message: Option<String>,
    /// Threshold the score was compared against.
    pub threshold: f32,
    /// Number of references in the snapshot used.
    pub references: usize,
}

impl RecognitionResult {
    fn failure(message: String, threshold: f32, references: usize, elapsed: Duration) -> Self {
        Self {
            is_match: false,
            similarity_score: 0.0,
            processing_time: elapsed,
            error_message: Some(message),
            threshold,
            references,
        }
    }

    /// Returns true if the call completed without a failure message.
    pub fn is_ok(&self) -> bool {
        self.error_message.is_none()
    }
}

/// Per-call options.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecognizeOptions {
    /// Threshold override; `None` uses the configured default.
    pub threshold: Option<f32>,
    /// Budget checked before each reference comparison.
    pub deadline: Option<Duration>,
}

enum Scan {
    Complete(f32),
    Aborted { compared: usize },
}

/// Stateless recognizer shared across threads.
pub struct RecognitionEngine {
    cfg: EngineConfig,
    preprocessor: Preprocessor,
    extractor: FeatureExtractor,
    matcher: DescriptorMatcher,
    sink: Arc<dyn EventSink>,
}

impl RecognitionEngine {
    /// Creates an engine after validating `cfg`. Events are discarded until
    /// a sink is attached with [`with_sink`](Self::with_sink).
    pub fn new(cfg: EngineConfig) -> RefMatchResult<Self> {
        cfg.validate()?;
        let preprocessor = Preprocessor::new(cfg.preprocess_config())?;
        let extractor = FeatureExtractor::new(cfg.extractor_config())?;
        let matcher = DescriptorMatcher::new().with_parallel(cfg.parallel);
        Ok(Self {
            cfg,
            preprocessor,
            extractor,
            matcher,
            sink: Arc::new(NoopSink),
        })
    }

    /// Attaches the event sink.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Resolves the effective threshold for a call.
    ///
    /// Values outside `[0, 1]` (and NaN) are rejected, never clamped.
    pub fn resolve_threshold(&self, threshold: Option<f32>) -> RefMatchResult<f32> {
        let value = threshold.unwrap_or(self.cfg.default_threshold);
        if !(0.0..=1.0).contains(&value) {
            return Err(RefMatchError::InvalidThreshold { value });
        }
        Ok(value)
    }

    /// Normalizes and describes compressed image bytes.
    pub fn describe(&self, bytes: &[u8]) -> RefMatchResult<DescriptorSet> {
        let raster = self.preprocessor.normalize(bytes)?;
        Ok(self.extractor.extract(&raster))
    }

    /// Describes every reference image and builds an index in input order.
    ///
    /// A reference that cannot be decoded fails the whole build with an
    /// [`RefMatchError::ImageFormat`] naming it.
    pub fn build_index(&self, images: Vec<ReferenceImage>) -> RefMatchResult<ReferenceIndex> {
        let start = Instant::now();
        let _span = trace_span!("build_index", references = images.len()).entered();

        let entries = self.describe_all(images)?;
        let index = ReferenceIndex::build(entries);
        self.sink.record(&Event::IndexBuilt {
            generation: index.generation(),
            references: index.len(),
            elapsed: start.elapsed(),
        });
        Ok(index)
    }

    fn describe_reference(&self, image: ReferenceImage) -> RefMatchResult<ReferenceEntry> {
        let descriptors = self.describe(&image.bytes).map_err(|err| match err {
            RefMatchError::ImageFormat { reason } => {
                RefMatchError::image_format(format!("reference {}: {reason}", image.id))
            }
            other => other,
        })?;
        Ok(ReferenceEntry::new(image.id, image.category, descriptors)
            .with_metadata_map(image.metadata))
    }

    #[cfg(not(feature = "rayon"))]
    fn describe_all(&self, images: Vec<ReferenceImage>) -> RefMatchResult<Vec<ReferenceEntry>> {
        images
            .into_iter()
            .map(|image| self.describe_reference(image))
            .collect()
    }

    #[cfg(feature = "rayon")]
    fn describe_all(&self, images: Vec<ReferenceImage>) -> RefMatchResult<Vec<ReferenceEntry>> {
        if self.cfg.parallel {
            images
                .into_par_iter()
                .map(|image| self.describe_reference(image))
                .collect()
        } else {
            images
                .into_iter()
                .map(|image| self.describe_reference(image))
                .collect()
        }
    }

    /// Matches `bytes` against `index`.
    ///
    /// Returns `Err` only for an invalid threshold.
    pub fn recognize(
        &self,
        bytes: &[u8],
        index: &ReferenceIndex,
        threshold: Option<f32>,
    ) -> RefMatchResult<RecognitionResult> {
        self.recognize_with(
            bytes,
            index,
            RecognizeOptions {
                threshold,
                deadline: None,
            },
        )
    }

    /// Matches `bytes` against the snapshot current at call time.
    pub fn recognize_shared(
        &self,
        bytes: &[u8],
        shared: &SharedIndex,
        threshold: Option<f32>,
    ) -> RefMatchResult<RecognitionResult> {
        let snapshot = shared.snapshot();
        self.recognize(bytes, &snapshot, threshold)
    }

    /// Matches `bytes` against `index` with per-call options.
    pub fn recognize_with(
        &self,
        bytes: &[u8],
        index: &ReferenceIndex,
        opts: RecognizeOptions,
    ) -> RefMatchResult<RecognitionResult> {
        let threshold = self.resolve_threshold(opts.threshold)?;
        let references = index.len();

        let start = Instant::now();
        let _span = trace_span!(
            "recognize",
            bytes = bytes.len(),
            references = references
        )
        .entered();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.best_score(bytes, index, start, opts.deadline)
        }));
        let elapsed = start.elapsed();

        let result = match outcome {
            Ok(Ok(Scan::Complete(score))) => {
                let is_match = score >= threshold;
                self.sink.record(&Event::Recognized {
                    score,
                    is_match,
                    threshold,
                    references,
                    elapsed,
                });
                RecognitionResult {
                    is_match,
                    similarity_score: score,
                    processing_time: elapsed,
                    error_message: None,
                    threshold,
                    references,
                }
            }
            Ok(Ok(Scan::Aborted { compared })) => {
                self.sink.record(&Event::DeadlineExceeded {
                    compared,
                    references,
                    elapsed,
                });
                RecognitionResult::failure(
                    format!("deadline exceeded after {compared} of {references} references"),
                    threshold,
                    references,
                    elapsed,
                )
            }
            Ok(Err(RefMatchError::ImageFormat { reason })) => {
                self.sink.record(&Event::ImageRejected {
                    reason: &reason,
                    elapsed,
                });
                RecognitionResult::failure(reason, threshold, references, elapsed)
            }
            Ok(Err(err)) => {
                let reason = match err {
                    RefMatchError::Internal { reason } => reason,
                    other => other.to_string(),
                };
                self.internal_failure(reason, threshold, references, elapsed)
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                self.internal_failure(reason, threshold, references, elapsed)
            }
        };
        Ok(result)
    }

    fn internal_failure(
        &self,
        reason: String,
        threshold: f32,
        references: usize,
        elapsed: Duration,
    ) -> RecognitionResult {
        self.sink.record(&Event::InternalFailure {
            reason: &reason,
            elapsed,
        });
        let message = RefMatchError::internal(reason).to_string();
        RecognitionResult::failure(message, threshold, references, elapsed)
    }

    fn best_score(
        &self,
        bytes: &[u8],
        index: &ReferenceIndex,
        start: Instant,
        deadline: Option<Duration>,
    ) -> RefMatchResult<Scan> {
        let raster = self.preprocessor.normalize(bytes)?;
        let query = self.extractor.extract(&raster);

        let mut best = 0.0f32;
        for (compared, entry) in index.all().iter().enumerate() {
            if let Some(limit) = deadline {
                if start.elapsed() >= limit {
                    return Ok(Scan::Aborted { compared });
                }
            }
            let score = self.matcher.similarity(&query, entry.descriptors())?;
            if score > best {
                best = score;
            }
        }
        Ok(Scan::Complete(best))
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic during recognition".to_string()
    }
}
