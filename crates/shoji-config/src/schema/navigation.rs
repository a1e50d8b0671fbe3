//! Default navigation rules applied to every view.

use serde::{Deserialize, Serialize};

/// Glob rules, `^` prefix blocks, last match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub rules: Vec<String>,
    pub default_allow: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default_allow: true,
        }
    }
}
