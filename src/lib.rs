//! Request observation layer for a reverse proxy.
//!
//! Every inbound request is inspected (credential presence, session id, body,
//! page label, JSON-RPC method), logged, and, for an allow-list of paths,
//! reported as a telemetry page view before it is forwarded upstream.

pub mod config;
pub mod http;
pub mod inspect;
pub mod lifecycle;
pub mod observability;
pub mod telemetry;

pub use config::ObserverConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
