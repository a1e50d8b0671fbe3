//! Application identity.

use serde::{Deserialize, Serialize};

/// Who the running app is. `identifier` isolates per-app storage and
/// `channel` separates release channels sharing one identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    /// Reverse-DNS identifier, e.g. `dev.shoji.notes`.
    pub identifier: String,
    /// Release channel, e.g. `dev`, `canary`, `stable`.
    pub channel: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Shoji App".into(),
            identifier: "dev.shoji.app".into(),
            channel: "dev".into(),
        }
    }
}

impl AppConfig {
    /// Directory name used for persistent engine data of this app/channel.
    pub fn storage_key(&self) -> String {
        format!("{}-{}", self.identifier, self.channel)
    }
}
