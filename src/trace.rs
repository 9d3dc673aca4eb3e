//! Diagnostics: conditional tracing macros and the engine event sink.
//!
//! The macros emit `tracing` spans and events when the `tracing` feature is
//! enabled and compile to nothing otherwise. Engine-level outcomes go through
//! an [`EventSink`] injected at construction, so the caller owns where
//! records end up.

use std::time::Duration;

/// Create an info-level span for a major operation.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an info-level event for key measurements.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

/// Structured record of an engine outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum Event<'a> {
    /// A reference index finished building.
    IndexBuilt {
        generation: u64,
        references: usize,
        elapsed: Duration,
    },
    /// A recognition completed normally.
    Recognized {
        score: f32,
        is_match: bool,
        threshold: f32,
        references: usize,
        elapsed: Duration,
    },
    /// The query bytes were empty or undecodable.
    ImageRejected { reason: &'a str, elapsed: Duration },
    /// Extraction or matching failed unexpectedly.
    InternalFailure { reason: &'a str, elapsed: Duration },
    /// The caller's deadline elapsed between reference comparisons.
    DeadlineExceeded {
        compared: usize,
        references: usize,
        elapsed: Duration,
    },
}

/// Destination for engine events.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &Event<'_>);
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &Event<'_>) {}
}

/// Sink that forwards events to `tracing` with structured fields.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl EventSink for TracingSink {
    fn record(&self, event: &Event<'_>) {
        match *event {
            Event::IndexBuilt {
                generation,
                references,
                elapsed,
            } => tracing::info!(
                generation,
                references,
                ms = elapsed.as_millis() as u64,
                "reference index built"
            ),
            Event::Recognized {
                score,
                is_match,
                threshold,
                references,
                elapsed,
            } => tracing::info!(
                score,
                is_match,
                threshold,
                references,
                ms = elapsed.as_millis() as u64,
                "recognize done"
            ),
            Event::ImageRejected { reason, elapsed } => tracing::warn!(
                reason,
                ms = elapsed.as_millis() as u64,
                "image rejected"
            ),
            Event::InternalFailure { reason, elapsed } => tracing::error!(
                reason,
                ms = elapsed.as_millis() as u64,
                "recognize failed"
            ),
            Event::DeadlineExceeded {
                compared,
                references,
                elapsed,
            } => tracing::warn!(
                compared,
                references,
                ms = elapsed.as_millis() as u64,
                "recognize deadline exceeded"
            ),
        }
    }
}
