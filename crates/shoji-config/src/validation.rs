//! Config validation. Collects every problem into one `ConfigError`.

use crate::schema::ShellConfig;
use shoji_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ShellConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push("app.name must not be empty".into());
    }
    if config.app.identifier.trim().is_empty() {
        errors.push("app.identifier must not be empty".into());
    }
    if config.app.identifier.contains(['/', '\\']) {
        errors.push(format!(
            "app.identifier '{}' must not contain path separators",
            config.app.identifier
        ));
    }
    if !(config.window.width > 0.0 && config.window.height > 0.0) {
        errors.push(format!(
            "window size must be positive, got {}x{}",
            config.window.width, config.window.height
        ));
    }
    for (name, value) in &config.engine.flags {
        if name.is_empty() || name.starts_with('-') {
            errors.push(format!("engine flag '{name}' must be a bare switch name"));
        }
        if value.is_object() || value.is_array() {
            errors.push(format!("engine flag '{name}' has a nested value"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
