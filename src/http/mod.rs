//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware/observe.rs (headers, body, classification, telemetry)
//!     → server.rs forward_handler (single upstream)
//!     → Send upstream response to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{observe_request, RequestObserver};
pub use request::{RequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
