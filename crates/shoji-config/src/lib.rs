//! Shoji configuration.
//!
//! TOML config for the shell process plus the engine flag passthrough read
//! from a bundle's `build.json`. All sections use serde defaults so partial
//! files work, and invalid values are reported as warnings rather than
//! refusing to start.

pub mod engine_flags;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use engine_flags::EngineFlag;
pub use schema::{
    AppConfig, EngineConfig, LogLevel, LoggingConfig, NavigationConfig, ShellConfig,
    WindowDefaults,
};

use shoji_common::ConfigError;
use std::path::Path;

/// Load config from `path` if given, otherwise from the platform default
/// location (creating it on first run).
pub fn load_config(path: Option<&Path>) -> Result<ShellConfig, ConfigError> {
    match path {
        Some(p) => toml_loader::load_from_path(p),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ShellConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_sections() {
        let json = config_to_json(&ShellConfig::default());
        assert!(json.contains("\"app\""));
        assert!(json.contains("\"navigation\""));
        assert!(json.contains("\"engine\""));
    }

    #[test]
    fn load_config_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoji.toml");
        std::fs::write(&path, "[app]\nname = \"Notes\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.app.name, "Notes");
    }
}
