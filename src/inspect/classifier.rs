//! Request classification.
//!
//! Derives the analytics page label for a request and, for tool calls posted
//! to the root path, the JSON-RPC method named in the body.
//!
//! # Rules (first match wins)
//! 1. Non-empty path other than `/` → the path itself.
//! 2. `POST /` → `"MCP tool"`, with the body's top-level `method` string.
//!    A body that is not JSON relabels the request `"Unknown page"`.
//! 3. Anything else → `"Unknown page"`.

use axum::http::Method;
use serde_json::Value;
use tracing::debug;

use crate::inspect::headers::HeaderSignals;

/// Page label for JSON-RPC posts to the root path.
pub const MCP_TOOL_PAGE: &str = "MCP tool";

/// Page label when no better label can be derived.
pub const UNKNOWN_PAGE: &str = "Unknown page";

/// RPC method reported when the body carries `"method": null`.
pub const UNKNOWN_METHOD: &str = "Unknown method";

/// Everything learned about one request. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub page: String,
    pub rpc_method: Option<String>,
    pub session_id: Option<String>,
    pub auth_present: bool,
}

/// Combine header signals with the page classification of `method path body`.
pub fn classify(method: &Method, path: &str, body: &str, signals: HeaderSignals) -> ClassificationResult {
    let (page, rpc_method) = classify_page(method, path, body);
    ClassificationResult {
        page,
        rpc_method,
        session_id: signals.session_id,
        auth_present: signals.auth_present,
    }
}

/// Page label and optional RPC method for a request.
pub fn classify_page(method: &Method, path: &str, body: &str) -> (String, Option<String>) {
    if !path.is_empty() && path != "/" {
        return (path.to_string(), None);
    }

    if path == "/" && *method == Method::POST {
        return match rpc_method(body) {
            Ok(rpc_method) => (MCP_TOOL_PAGE.to_string(), rpc_method),
            Err(e) => {
                debug!(error = %e, "Root POST body is not JSON");
                (UNKNOWN_PAGE.to_string(), None)
            }
        };
    }

    (UNKNOWN_PAGE.to_string(), None)
}

/// Top-level `method` field of a JSON body.
///
/// Only a parse failure is an error. A missing field, a non-object document or
/// a non-string value all mean "no method".
fn rpc_method(body: &str) -> Result<Option<String>, serde_json::Error> {
    let document: Value = serde_json::from_str(body)?;
    Ok(match document.get("method") {
        Some(Value::String(name)) => Some(name.clone()),
        Some(Value::Null) => Some(UNKNOWN_METHOD.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(method: Method, path: &str, body: &str) -> (String, Option<String>) {
        classify_page(&method, path, body)
    }

    #[test]
    fn non_root_path_is_its_own_page() {
        for method in [Method::GET, Method::POST, Method::DELETE] {
            assert_eq!(page(method, "/foo", r#"{"method":"x"}"#), ("/foo".to_string(), None));
        }
        assert_eq!(page(Method::GET, "/info", ""), ("/info".to_string(), None));
    }

    #[test]
    fn root_post_reads_rpc_method() {
        assert_eq!(
            page(Method::POST, "/", r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#),
            (MCP_TOOL_PAGE.to_string(), Some("tools/list".to_string()))
        );
    }

    #[test]
    fn root_post_without_method_field() {
        assert_eq!(page(Method::POST, "/", r#"{"id":1}"#), (MCP_TOOL_PAGE.to_string(), None));
    }

    #[test]
    fn root_post_with_null_method() {
        assert_eq!(
            page(Method::POST, "/", r#"{"method":null}"#),
            (MCP_TOOL_PAGE.to_string(), Some(UNKNOWN_METHOD.to_string()))
        );
    }

    #[test]
    fn root_post_with_non_object_or_non_string_method() {
        assert_eq!(page(Method::POST, "/", "[1,2]"), (MCP_TOOL_PAGE.to_string(), None));
        assert_eq!(page(Method::POST, "/", r#"{"method":7}"#), (MCP_TOOL_PAGE.to_string(), None));
    }

    #[test]
    fn nested_method_is_ignored() {
        assert_eq!(
            page(Method::POST, "/", r#"{"params":{"method":"inner"}}"#),
            (MCP_TOOL_PAGE.to_string(), None)
        );
    }

    /// A body that fails to parse drops the "MCP tool" label entirely. Telemetry
    /// dashboards group on this, so changing it must be deliberate.
    #[test]
    fn malformed_json_on_root_post_relabels_as_unknown_page() {
        assert_eq!(page(Method::POST, "/", "not-json"), (UNKNOWN_PAGE.to_string(), None));
        assert_eq!(page(Method::POST, "/", ""), (UNKNOWN_PAGE.to_string(), None));
    }

    #[test]
    fn root_non_post_is_unknown() {
        for method in [Method::GET, Method::PUT, Method::HEAD] {
            assert_eq!(page(method, "/", r#"{"method":"tools/list"}"#), (UNKNOWN_PAGE.to_string(), None));
        }
    }

    #[test]
    fn empty_path_is_unknown() {
        assert_eq!(page(Method::POST, "", r#"{"method":"x"}"#), (UNKNOWN_PAGE.to_string(), None));
    }

    #[test]
    fn classify_carries_header_signals() {
        let signals = HeaderSignals {
            auth_present: true,
            session_id: Some("thread-1".into()),
        };
        let result = classify(&Method::GET, "/metrics", "", signals);
        assert_eq!(
            result,
            ClassificationResult {
                page: "/metrics".into(),
                rpc_method: None,
                session_id: Some("thread-1".into()),
                auth_present: true,
            }
        );
    }
}
