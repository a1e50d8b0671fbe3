//! Host-generated notifications carried on the event channel.

use serde::Serialize;

use crate::payload::Payload;

/// Notification raised by the host about a view, delivered through the
/// view's event callback like any script-posted event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventNotification {
    /// Result of `evaluateScriptWithCompletion`, correlated by `id`.
    ScriptResult {
        id: String,
        result: serde_json::Value,
    },
    LoadStarted {
        url: String,
    },
    LoadFinished {
        url: String,
    },
    TitleChanged {
        title: String,
    },
    WillNavigate {
        url: String,
        allowed: bool,
    },
}

impl EventNotification {
    /// Build a script result from the engine's JSON-encoded return value.
    /// Text that is not JSON is kept as a string.
    pub fn script_result(id: impl Into<String>, raw: &str) -> Self {
        let result = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        EventNotification::ScriptResult {
            id: id.into(),
            result,
        }
    }

    pub fn to_payload(&self) -> Payload {
        Payload::from(serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string()))
    }
}
