//! Per-request inspection.
//!
//! # Data Flow
//! ```text
//! Request headers → headers.rs   (auth presence, session id)
//! Request body    → body.rs      (buffer, decode, restore)
//! method + path + body text
//!                 → classifier.rs (page label, rpc method)
//!                 → ClassificationResult
//! ```
//!
//! All three steps are pure functions of the request; nothing is shared
//! between requests.

pub mod body;
pub mod classifier;
pub mod headers;

pub use body::{capture_body, Capture};
pub use classifier::{classify, ClassificationResult, MCP_TOOL_PAGE, UNKNOWN_METHOD, UNKNOWN_PAGE};
pub use headers::{inspect_headers, HeaderSignals, THREAD_ID_HEADER};
