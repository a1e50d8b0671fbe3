//! Wire types of the control protocol.
//!
//! One JSON object per line in each direction. Requests carry an `id`
//! that the matching response echoes; notifications carry `event`
//! instead and are never answered.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shoji_bridge::Channel;
use shoji_common::{TrayId, ViewId, WindowId};

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: u64, error: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Where a menu click came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuSource {
    Tray,
    Application,
    Context,
}

/// Unsolicited messages to the control process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Notification {
    /// A string posted by a view on one of its bridge channels.
    #[serde(rename_all = "camelCase")]
    BridgeMessage {
        view_id: ViewId,
        channel: Channel,
        payload: String,
    },
    #[serde(rename_all = "camelCase")]
    MenuClicked {
        source: MenuSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        tray_id: Option<TrayId>,
        action: String,
    },
    #[serde(rename_all = "camelCase")]
    WindowClosed { window_id: WindowId },
    #[serde(rename_all = "camelCase")]
    WindowMoved { window_id: WindowId, x: f64, y: f64 },
    #[serde(rename_all = "camelCase")]
    WindowResized {
        window_id: WindowId,
        width: f64,
        height: f64,
    },
    #[serde(rename_all = "camelCase")]
    WindowFocused { window_id: WindowId, focused: bool },
    #[serde(rename_all = "camelCase")]
    WindowCreationFailed { window_id: WindowId, error: String },
}
