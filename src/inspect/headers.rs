//! Header signal extraction.
//!
//! Two independent lookups: the presence of a credential and an opaque
//! session correlation id. Neither value is interpreted.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::info;

/// Header carrying the client's session correlation id.
pub const THREAD_ID_HEADER: &str = "x-custom-thread-id";

/// Signals read from the request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSignals {
    /// An `Authorization` header was sent. Its value is never inspected.
    pub auth_present: bool,
    /// Verbatim `x-custom-thread-id` value; repeated headers joined with `,`.
    pub session_id: Option<String>,
}

/// Read the credential marker and session id from `headers`.
///
/// Header name matching is case-insensitive. Missing headers are a normal
/// outcome and are logged as such.
pub fn inspect_headers(headers: &HeaderMap) -> HeaderSignals {
    let auth_present = headers.contains_key(AUTHORIZATION);
    if auth_present {
        info!("Authorization header found");
    } else {
        info!("No Authorization header present");
    }

    // Repeated headers are joined with ',' in arrival order.
    let values: Vec<_> = headers
        .get_all(THREAD_ID_HEADER)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .collect();
    let session_id = (!values.is_empty()).then(|| values.join(","));
    match &session_id {
        Some(id) => info!(session_id = %id, "x-custom-thread-id header found"),
        None => info!("No x-custom-thread-id header present"),
    }

    HeaderSignals {
        auth_present,
        session_id,
    }
}
