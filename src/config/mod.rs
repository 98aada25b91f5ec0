//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ObserverConfig (validated, immutable)
//!     → consumed once at startup by server, logging, metrics
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CaptureConfig, ListenerConfig, LogFileConfig, LogFormat, LogRotation, LoggingConfig,
    MetricsConfig, ObserverConfig, SinkKind, TelemetryConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
