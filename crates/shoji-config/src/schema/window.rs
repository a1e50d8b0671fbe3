//! Default window settings.

use serde::{Deserialize, Serialize};

/// Defaults applied to windows whose creation request leaves a field out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDefaults {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub transparent: bool,
    pub decorations: bool,
    /// Keep the event loop alive after the last window closes while a tray
    /// icon exists.
    pub keep_alive_with_tray: bool,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            title: "Shoji".into(),
            width: 800.0,
            height: 600.0,
            transparent: false,
            decorations: true,
            keep_alive_with_tray: true,
        }
    }
}
