//! Telemetry event record.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::inspect::ClassificationResult;

/// Property holding the JSON-RPC method of a tool call.
pub const MCP_METHOD: &str = "McpMethod";

/// Property holding the client's session correlation id.
pub const AGENT_THREAD_ID: &str = "AgentThreadId";

/// Property recording whether an `Authorization` header was sent.
pub const BEARER_TOKEN_PRESENT: &str = "BearerTokenPresent";

/// A named page view with string properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl TelemetryEvent {
    /// Build the page view for a classified request.
    ///
    /// Optional properties are only set when their value is non-empty;
    /// `BearerTokenPresent` is always set, as `"True"` or `"False"`.
    pub fn page_view(result: &ClassificationResult) -> Self {
        let mut properties = BTreeMap::new();

        if let Some(method) = result.rpc_method.as_deref().filter(|m| !m.is_empty()) {
            properties.insert(MCP_METHOD.to_string(), method.to_string());
        }
        if let Some(id) = result.session_id.as_deref().filter(|id| !id.is_empty()) {
            properties.insert(AGENT_THREAD_ID.to_string(), id.to_string());
        }
        properties.insert(
            BEARER_TOKEN_PRESENT.to_string(),
            bool_label(result.auth_present).to_string(),
        );

        Self {
            name: result.page.clone(),
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(rpc_method: Option<&str>, session_id: Option<&str>, auth_present: bool) -> ClassificationResult {
        ClassificationResult {
            page: "MCP tool".into(),
            rpc_method: rpc_method.map(Into::into),
            session_id: session_id.map(Into::into),
            auth_present,
        }
    }

    #[test]
    fn full_event() {
        let event = TelemetryEvent::page_view(&result(Some("tools/call"), Some("t-9"), true));
        assert_eq!(event.name, "MCP tool");
        assert_eq!(event.property(MCP_METHOD), Some("tools/call"));
        assert_eq!(event.property(AGENT_THREAD_ID), Some("t-9"));
        assert_eq!(event.property(BEARER_TOKEN_PRESENT), Some("True"));
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let event = TelemetryEvent::page_view(&result(Some(""), Some(""), false));
        assert_eq!(event.properties.len(), 1);
        assert_eq!(event.property(BEARER_TOKEN_PRESENT), Some("False"));

        let event = TelemetryEvent::page_view(&result(None, None, false));
        assert_eq!(event.properties.len(), 1);
    }

    #[test]
    fn serializes_as_name_and_properties() {
        let event = TelemetryEvent::page_view(&result(None, None, true));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "MCP tool",
                "properties": { "BearerTokenPresent": "True" }
            })
        );
    }
}
