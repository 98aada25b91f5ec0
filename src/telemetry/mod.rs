//! Telemetry subsystem.
//!
//! # Data Flow
//! ```text
//! ClassificationResult + request path
//!     → emitter.rs (allow-list gate: "/", "/info")
//!     → event.rs   (page view: name + string properties)
//!     → sink.rs    (log | http queue | memory | null)
//! ```
//!
//! # Design Decisions
//! - Sinks never block the request; failures are logged and dropped
//! - No retries

pub mod emitter;
pub mod event;
pub mod sink;

use std::sync::Arc;

use crate::config::{SinkKind, TelemetryConfig};

pub use emitter::{EmitOutcome, TelemetryEmitter};
pub use event::{TelemetryEvent, AGENT_THREAD_ID, BEARER_TOKEN_PRESENT, MCP_METHOD};
pub use sink::{HttpSink, LogSink, MemorySink, NullSink, TelemetryError, TelemetrySink};

/// Build the sink selected by `config.sink`.
///
/// The HTTP sink spawns its delivery task, so this must run inside a Tokio runtime.
pub fn sink_from_config(config: &TelemetryConfig) -> Result<Arc<dyn TelemetrySink>, TelemetryError> {
    Ok(match config.sink {
        SinkKind::Log => Arc::new(LogSink),
        SinkKind::Http => Arc::new(HttpSink::spawn(config)?),
        SinkKind::Disabled => Arc::new(NullSink),
    })
}
