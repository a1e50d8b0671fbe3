//! Rendering engine options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Engine command-line passthrough.
///
/// `flags` holds raw values so the same conversion applies to TOML and to
/// `build.json` input; see [`crate::engine_flags`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub flags: BTreeMap<String, serde_json::Value>,
    /// Optional bundle `build.json` whose `chromiumFlags` object is merged
    /// over `flags`.
    pub build_json: Option<PathBuf>,
    pub devtools: bool,
}
