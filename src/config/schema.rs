//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the observer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the request observer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObserverConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream the observed requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request body capture limits.
    pub capture: CaptureConfig,

    /// Telemetry sink and eligible routes.
    pub telemetry: TelemetryConfig,

    /// Log output settings.
    pub logging: LoggingConfig,

    /// Prometheus exporter settings.
    pub metrics: MetricsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream server the proxy forwards to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Body capture configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Largest declared body that is buffered for classification.
    /// Unset means every body is read up to its declared length.
    pub max_body_bytes: Option<usize>,
}

/// Where telemetry events are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Structured log record per event.
    #[default]
    Log,
    /// JSON POST to `telemetry.endpoint`.
    Http,
    /// Events are dropped.
    Disabled,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Sink implementation.
    pub sink: SinkKind,

    /// Ingestion URL for the HTTP sink.
    pub endpoint: Option<String>,

    /// Sent as `x-instrumentation-key` by the HTTP sink.
    pub instrumentation_key: Option<String>,

    /// Events buffered before the HTTP sink starts rejecting.
    pub queue_capacity: usize,

    /// Per-delivery timeout for the HTTP sink in seconds.
    pub timeout_secs: u64,

    /// Exact request paths that produce an event.
    pub tracked_paths: Vec<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Log,
            endpoint: None,
            instrumentation_key: None,
            queue_capacity: 1024,
            timeout_secs: 5,
            tracked_paths: vec!["/".to_string(), "/info".to_string()],
        }
    }
}

/// Log line format for stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub level: String,

    /// Stdout format.
    pub format: LogFormat,

    /// Optional rolling file output.
    pub file: Option<LogFileConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Rolling log file settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogFileConfig {
    /// Directory the log files are written to.
    pub directory: String,

    /// File name prefix; the rotation date is appended.
    pub file_name_prefix: String,

    pub rotation: LogRotation,

    /// Number of rotated files kept on disk.
    pub retained_file_count_limit: usize,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name_prefix: "proxy-diagnostics".to_string(),
            rotation: LogRotation::Daily,
            retained_file_count_limit: 5,
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable the Prometheus scrape endpoint.
    pub enabled: bool,

    /// Metrics endpoint bind address.
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: ObserverConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.telemetry.sink, SinkKind::Log);
        assert_eq!(config.telemetry.tracked_paths, vec!["/", "/info"]);
        assert!(config.logging.file.is_none());
        assert_eq!(config.capture.max_body_bytes, None);
    }

    #[test]
    fn capture_limit_is_opt_in() {
        let config: ObserverConfig = toml::from_str("[capture]\nmax_body_bytes = 65536").unwrap();
        assert_eq!(config.capture.max_body_bytes, Some(65536));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: ObserverConfig = toml::from_str(
            r#"
            [telemetry]
            sink = "http"
            endpoint = "http://collector:4318/track"

            [logging.file]
            directory = "/var/log/observer"
            "#,
        )
        .unwrap();

        assert_eq!(config.telemetry.sink, SinkKind::Http);
        assert_eq!(config.telemetry.queue_capacity, 1024);
        let file = config.logging.file.unwrap();
        assert_eq!(file.directory, "/var/log/observer");
        assert_eq!(file.file_name_prefix, "proxy-diagnostics");
        assert_eq!(file.retained_file_count_limit, 5);
    }
}
