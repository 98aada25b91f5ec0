//! Telemetry sinks.
//!
//! `submit` never waits on I/O. Sinks that talk to a backend queue the event
//! and deliver it from a background task; a full queue rejects the event.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::TelemetryConfig;
use crate::telemetry::event::TelemetryEvent;

/// Header carrying the configured instrumentation key.
pub const INSTRUMENTATION_KEY_HEADER: &str = "x-instrumentation-key";

/// Telemetry delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("telemetry queue is full")]
    QueueFull,
    #[error("telemetry sink is closed")]
    Closed,
    #[error("telemetry endpoint is not configured")]
    MissingEndpoint,
    #[error("failed to build telemetry client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Destination for telemetry events.
///
/// Implementations are shared by every in-flight request and must not block.
pub trait TelemetrySink: Send + Sync {
    fn submit(&self, event: TelemetryEvent) -> Result<(), TelemetryError>;
}

/// Writes each event as a structured log record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn submit(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        info!(
            target: "telemetry",
            page = %event.name,
            properties = ?event.properties,
            "Page view"
        );
        Ok(())
    }
}

/// Accepts and drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn submit(&self, _event: TelemetryEvent) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Keeps submitted events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events submitted so far, in submission order.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl TelemetrySink for MemorySink {
    fn submit(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        self.events.lock().map_err(|_| TelemetryError::Closed)?.push(event);
        Ok(())
    }
}

/// Wire format posted to the ingestion endpoint.
#[derive(Debug, Serialize)]
struct Envelope {
    name: String,
    /// Milliseconds since the Unix epoch at submission.
    time: u64,
    properties: BTreeMap<String, String>,
}

impl Envelope {
    fn new(event: TelemetryEvent) -> Self {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            name: event.name,
            time,
            properties: event.properties,
        }
    }
}

/// Posts events as JSON to an HTTP ingestion endpoint.
pub struct HttpSink {
    tx: mpsc::Sender<Envelope>,
}

impl HttpSink {
    /// Build the sink and spawn its delivery task on the current runtime.
    pub fn spawn(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or(TelemetryError::MissingEndpoint)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));

        tokio::spawn(deliver(client, endpoint, config.instrumentation_key.clone(), rx));

        Ok(Self { tx })
    }
}

impl TelemetrySink for HttpSink {
    fn submit(&self, event: TelemetryEvent) -> Result<(), TelemetryError> {
        self.tx.try_send(Envelope::new(event)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TelemetryError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => TelemetryError::Closed,
        })
    }
}

async fn deliver(
    client: reqwest::Client,
    endpoint: String,
    instrumentation_key: Option<String>,
    mut rx: mpsc::Receiver<Envelope>,
) {
    while let Some(envelope) = rx.recv().await {
        let mut request = client.post(&endpoint).json(&envelope);
        if let Some(key) = &instrumentation_key {
            request = request.header(INSTRUMENTATION_KEY_HEADER, key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!(page = %envelope.name, "Telemetry event delivered");
            }
            Ok(response) => {
                warn!(page = %envelope.name, status = %response.status(), "Telemetry backend rejected event");
            }
            Err(e) => {
                warn!(page = %envelope.name, error = %e, "Telemetry delivery failed");
            }
        }
    }
    debug!("Telemetry delivery task stopped");
}
