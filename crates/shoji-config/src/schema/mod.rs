//! Configuration schema types.
//!
//! Every struct uses `serde(default)` so partial configs deserialize.

mod app;
mod engine;
mod navigation;
mod system;
mod window;

pub use app::*;
pub use engine::*;
pub use navigation::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the shell process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub app: AppConfig,
    pub window: WindowDefaults,
    pub navigation: NavigationConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: ShellConfig = toml::from_str("").unwrap();
        assert_eq!(config.app.name, "Shoji App");
        assert_eq!(config.window.width, 800.0);
        assert!(config.navigation.default_allow);
        assert!(config.engine.flags.is_empty());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn engine_flags_table_keeps_value_types() {
        let config: ShellConfig = toml::from_str(
            r#"
[engine.flags]
disable-gpu = true
lang = "en-US"
"#,
        )
        .unwrap();
        assert_eq!(config.engine.flags["disable-gpu"], serde_json::json!(true));
        assert_eq!(config.engine.flags["lang"], serde_json::json!("en-US"));
    }

    #[test]
    fn navigation_rules_parse_as_list() {
        let config: ShellConfig = toml::from_str(
            r#"
[navigation]
rules = ["^*", "https://*.example.com/*"]
"#,
        )
        .unwrap();
        assert_eq!(config.navigation.rules.len(), 2);
        assert_eq!(config.navigation.rules[0], "^*");
    }
}
