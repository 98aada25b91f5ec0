//! Request observation middleware.
//!
//! Runs once per request, in order:
//! headers → body capture → classification → telemetry → next handler.
//! Every stage contains its own failures, so the request always reaches
//! the next handler with its body intact.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::inspect::{capture_body, classify, inspect_headers, ClassificationResult};
use crate::observability::metrics;
use crate::telemetry::{EmitOutcome, TelemetryEmitter};

/// Shared, immutable observation settings.
#[derive(Clone)]
pub struct RequestObserver {
    emitter: TelemetryEmitter,
    max_body_bytes: Option<usize>,
}

impl RequestObserver {
    pub fn new(emitter: TelemetryEmitter, max_body_bytes: Option<usize>) -> Self {
        Self {
            emitter,
            max_body_bytes,
        }
    }

    /// Inspect `request`, emit its telemetry, and return it ready to forward.
    pub async fn observe(&self, request: Request<Body>) -> (Request<Body>, ClassificationResult, EmitOutcome) {
        let signals = inspect_headers(request.headers());
        let (request, capture) = capture_body(request, self.max_body_bytes).await;

        let path = request.uri().path();
        let result = classify(request.method(), path, &capture.text(), signals);
        let outcome = self.emitter.emit(path, &result);

        metrics::record_request(outcome != EmitOutcome::Skipped);
        debug!(
            page = %result.page,
            rpc_method = ?result.rpc_method,
            telemetry = outcome.as_str(),
            "Request classified"
        );

        (request, result, outcome)
    }
}

/// Axum middleware that observes each request before passing it on.
pub async fn observe_request(
    State(observer): State<Arc<RequestObserver>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (request, _, _) = observer.observe(request).await;
    next.run(request).await
}
