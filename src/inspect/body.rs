//! Request body capture.
//!
//! The body is buffered once, decoded for classification, and put back into
//! the request as a fresh `Body` holding the same bytes, so the forwarding
//! handler sees exactly what the client sent.

use axum::{
    body::{Body, Bytes},
    http::{header::CONTENT_LENGTH, HeaderMap, HeaderValue, Request},
};
use tracing::{info, warn};

use crate::observability::metrics;

/// Result of a capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// No declared length, or a declared length of zero. The body was not touched.
    Empty,
    /// Declared length exceeds the configured capture limit. The body was not touched.
    TooLarge(u64),
    /// Body buffered and restored.
    Captured(Bytes),
    /// Reading the body failed. The request now carries an empty body.
    Failed,
}

impl Capture {
    /// UTF-8 view used for classification. Invalid sequences are replaced.
    pub fn text(&self) -> String {
        match self {
            Capture::Captured(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            _ => String::new(),
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            Capture::Empty => "empty",
            Capture::TooLarge(_) => "too_large",
            Capture::Captured(_) => "captured",
            Capture::Failed => "failed",
        }
    }
}

/// Declared `Content-Length`, if present and well formed.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Buffer the request body for inspection and hand back an equivalent request.
///
/// Only bodies with a positive declared length are read, and never past that
/// length. With `Some(limit)`, bodies declaring more than `limit` bytes are
/// left untouched. A read failure never aborts the request: the returned
/// request carries an empty body and a matching `Content-Length: 0`.
pub async fn capture_body(request: Request<Body>, limit: Option<usize>) -> (Request<Body>, Capture) {
    let declared = match content_length(request.headers()) {
        Some(len) if len > 0 => len,
        _ => {
            metrics::record_body_capture(Capture::Empty.outcome(), 0);
            return (request, Capture::Empty);
        }
    };

    if let Some(limit) = limit.filter(|&limit| declared > limit as u64) {
        warn!(declared, limit, "Request body exceeds capture limit, skipping");
        let capture = Capture::TooLarge(declared);
        metrics::record_body_capture(capture.outcome(), 0);
        return (request, capture);
    }

    let bound = usize::try_from(declared).unwrap_or(usize::MAX);
    let (mut parts, body) = request.into_parts();
    let capture = match axum::body::to_bytes(body, bound).await {
        Ok(bytes) => {
            info!(body = %String::from_utf8_lossy(&bytes), "Request body");
            Capture::Captured(bytes)
        }
        Err(e) => {
            warn!(error = %e, "Failed to read request body, continuing with empty body");
            parts
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
            Capture::Failed
        }
    };

    let body = match &capture {
        Capture::Captured(bytes) => {
            metrics::record_body_capture(capture.outcome(), bytes.len());
            Body::from(bytes.clone())
        }
        _ => {
            metrics::record_body_capture(capture.outcome(), 0);
            Body::empty()
        }
    };

    (Request::from_parts(parts, body), capture)
}
