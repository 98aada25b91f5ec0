//! Gated telemetry emission.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::inspect::ClassificationResult;
use crate::observability::metrics;
use crate::telemetry::event::TelemetryEvent;
use crate::telemetry::sink::TelemetrySink;

/// What happened to a request's telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Path is not on the allow-list.
    Skipped,
    /// Event accepted by the sink.
    Submitted,
    /// Sink refused the event. Already logged.
    Failed,
}

impl EmitOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmitOutcome::Skipped => "skipped",
            EmitOutcome::Submitted => "submitted",
            EmitOutcome::Failed => "failed",
        }
    }
}

/// Emits page views for an exact-match allow-list of paths.
#[derive(Clone)]
pub struct TelemetryEmitter {
    sink: Arc<dyn TelemetrySink>,
    tracked_paths: Arc<HashSet<String>>,
}

impl TelemetryEmitter {
    pub fn new<I, S>(sink: Arc<dyn TelemetrySink>, tracked_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sink,
            tracked_paths: Arc::new(tracked_paths.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether requests to `path` produce an event. No prefix matching.
    pub fn is_tracked(&self, path: &str) -> bool {
        self.tracked_paths.contains(path)
    }

    /// Submit a page view for `result` if `path` is tracked.
    ///
    /// Sink errors are logged and reported through the outcome only.
    pub fn emit(&self, path: &str, result: &ClassificationResult) -> EmitOutcome {
        let outcome = if !self.is_tracked(path) {
            EmitOutcome::Skipped
        } else {
            match self.sink.submit(TelemetryEvent::page_view(result)) {
                Ok(()) => EmitOutcome::Submitted,
                Err(e) => {
                    warn!(page = %result.page, error = %e, "Dropping telemetry event");
                    EmitOutcome::Failed
                }
            }
        };

        metrics::record_telemetry(outcome.as_str());
        outcome
    }
}
