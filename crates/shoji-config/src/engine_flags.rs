//! Engine command-line flag passthrough.
//!
//! Flags come from `[engine.flags]` in the TOML config and from the
//! `chromiumFlags` object of a bundle's `build.json`. Values map to
//! switches as follows:
//!
//! - `true` → `--name`
//! - `false` → omitted
//! - `"v"` → `--name=v`
//! - numbers → `--name=<json text>`
//!
//! Nested objects and arrays are unsupported and skipped with a warning.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::EngineConfig;

/// One engine switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFlag {
    pub name: String,
    pub value: Option<String>,
}

impl EngineFlag {
    /// Render as a command-line argument.
    pub fn to_switch(&self) -> String {
        match &self.value {
            Some(v) => format!("--{}={}", self.name, v),
            None => format!("--{}", self.name),
        }
    }
}

/// Convert a flag table into switches, in key order.
pub fn flags_from_map(map: &BTreeMap<String, Value>) -> Vec<EngineFlag> {
    map.iter()
        .filter_map(|(name, value)| flag_from_value(name, value))
        .collect()
}

fn flag_from_value(name: &str, value: &Value) -> Option<EngineFlag> {
    let value = match value {
        Value::Bool(true) => None,
        Value::Bool(false) | Value::Null => return None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            warn!(flag = %name, "engine flag has a nested value; skipping");
            return None;
        }
    };
    Some(EngineFlag {
        name: name.to_string(),
        value,
    })
}

/// Parse the `chromiumFlags` object out of `build.json` content.
///
/// Malformed JSON or a missing/non-object `chromiumFlags` yields no flags.
pub fn parse_build_json(content: &str) -> Vec<EngineFlag> {
    let root: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "build.json is not valid JSON; no engine flags applied");
            return Vec::new();
        }
    };
    match root.get("chromiumFlags") {
        Some(Value::Object(obj)) => {
            let map: BTreeMap<String, Value> =
                obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            flags_from_map(&map)
        }
        Some(_) => {
            warn!("build.json chromiumFlags is not an object; ignoring");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Read and parse a `build.json` file. Unreadable files yield no flags.
pub fn load_build_json(path: &Path) -> Vec<EngineFlag> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_build_json(&content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no build.json flags");
            Vec::new()
        }
    }
}

/// All flags for an engine config: the TOML table, overridden by any
/// `build.json` entries with the same name.
pub fn resolve(config: &EngineConfig) -> Vec<EngineFlag> {
    let mut merged: BTreeMap<String, EngineFlag> = flags_from_map(&config.flags)
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();
    if let Some(path) = &config.build_json {
        for flag in load_build_json(path) {
            merged.insert(flag.name.clone(), flag);
        }
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flag(name: &str, value: Option<&str>) -> EngineFlag {
        EngineFlag {
            name: name.into(),
            value: value.map(String::from),
        }
    }

    #[test]
    fn switch_rendering() {
        assert_eq!(flag("disable-gpu", None).to_switch(), "--disable-gpu");
        assert_eq!(flag("lang", Some("fr")).to_switch(), "--lang=fr");
    }

    #[test]
    fn build_json_bool_and_string_flags() {
        let flags = parse_build_json(
            r#"{"name":"x","chromiumFlags":{"disable-gpu":true,"lang":"de","off":false}}"#,
        );
        assert_eq!(
            flags,
            vec![flag("disable-gpu", None), flag("lang", Some("de"))]
        );
    }

    #[test]
    fn build_json_nested_values_are_skipped() {
        let flags = parse_build_json(
            r#"{"chromiumFlags":{"a":{"b":"}"},"list":[1,2],"c":"d"}}"#,
        );
        assert_eq!(flags, vec![flag("c", Some("d"))]);
    }

    #[test]
    fn build_json_numbers_keep_json_text() {
        let flags = parse_build_json(r#"{"chromiumFlags":{"remote-debugging-port":9222}}"#);
        assert_eq!(flags, vec![flag("remote-debugging-port", Some("9222"))]);
    }

    #[test]
    fn build_json_without_flags_or_malformed_is_empty() {
        assert!(parse_build_json(r#"{"name":"x"}"#).is_empty());
        assert!(parse_build_json(r#"{"chromiumFlags":"oops"}"#).is_empty());
        assert!(parse_build_json("{not json").is_empty());
        assert!(parse_build_json("").is_empty());
    }

    #[test]
    fn build_json_overrides_toml_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.json");
        std::fs::write(&path, r#"{"chromiumFlags":{"lang":"ja","extra":true}}"#).unwrap();

        let mut config = EngineConfig::default();
        config.flags.insert("lang".into(), json!("en"));
        config.flags.insert("disable-gpu".into(), json!(true));
        config.build_json = Some(path);

        let flags = resolve(&config);
        assert_eq!(
            flags,
            vec![
                flag("disable-gpu", None),
                flag("extra", None),
                flag("lang", Some("ja")),
            ]
        );
    }

    #[test]
    fn missing_build_json_keeps_toml_flags() {
        let mut config = EngineConfig::default();
        config.flags.insert("lang".into(), json!("en"));
        config.build_json = Some("/tmp/definitely_missing_shoji_build.json".into());
        assert_eq!(resolve(&config), vec![flag("lang", Some("en"))]);
    }
}
