//! Configuration validation.
//!
//! Serde handles the syntactic checks; this pass checks values. Every
//! problem is collected so a bad file is reported in one go.

use std::net::SocketAddr;

use axum::http::uri::Authority;

use crate::config::schema::{ObserverConfig, SinkKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ObserverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.upstream.address.parse::<Authority>().is_err() {
        errors.push(ValidationError::new(
            "upstream.address",
            format!("'{}' is not a host:port authority", config.upstream.address),
        ));
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let telemetry = &config.telemetry;
    if telemetry.sink == SinkKind::Http {
        match telemetry.endpoint.as_deref() {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
            Some(url) => errors.push(ValidationError::new(
                "telemetry.endpoint",
                format!("'{}' must be an http(s) URL", url),
            )),
            None => errors.push(ValidationError::new(
                "telemetry.endpoint",
                "required when telemetry.sink = \"http\"",
            )),
        }
    }

    if telemetry.queue_capacity == 0 {
        errors.push(ValidationError::new("telemetry.queue_capacity", "must be greater than 0"));
    }

    if telemetry.timeout_secs == 0 {
        errors.push(ValidationError::new("telemetry.timeout_secs", "must be greater than 0"));
    }

    for path in &telemetry.tracked_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "telemetry.tracked_paths",
                format!("'{}' must start with '/'", path),
            ));
        }
    }

    if let Some(file) = &config.logging.file {
        if file.retained_file_count_limit == 0 {
            errors.push(ValidationError::new(
                "logging.file.retained_file_count_limit",
                "must be greater than 0",
            ));
        }
        if file.file_name_prefix.is_empty() {
            errors.push(ValidationError::new("logging.file.file_name_prefix", "must not be empty"));
        }
    }

    if config.metrics.enabled && config.metrics.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "metrics.address",
            format!("'{}' is not a socket address", config.metrics.address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFileConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ObserverConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ObserverConfig::default();
        config.listener.bind_address = "not-an-addr".into();
        config.timeouts.request_secs = 0;
        config.telemetry.tracked_paths.push("info".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "timeouts.request_secs", "telemetry.tracked_paths"]
        );
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let mut config = ObserverConfig::default();
        config.upstream.connect_timeout_secs = 0;
        config.telemetry.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["upstream.connect_timeout_secs", "telemetry.timeout_secs"]);
    }

    #[test]
    fn http_sink_requires_endpoint() {
        let mut config = ObserverConfig::default();
        config.telemetry.sink = SinkKind::Http;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "telemetry.endpoint");

        config.telemetry.endpoint = Some("ftp://collector".into());
        assert!(validate_config(&config).is_err());

        config.telemetry.endpoint = Some("https://collector/track".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn log_file_retention_must_be_positive() {
        let mut config = ObserverConfig::default();
        config.logging.file = Some(LogFileConfig {
            retained_file_count_limit: 0,
            ..LogFileConfig::default()
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "logging.file.retained_file_count_limit");
    }
}
