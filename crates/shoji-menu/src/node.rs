//! Tolerant parsing of menu trees.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Label used for the row that stands in for an empty or unreadable menu.
pub const PLACEHOLDER_LABEL: &str = "Menu Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Normal,
    Checkbox,
    Separator,
    Submenu,
}

/// One entry of a menu tree with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub kind: NodeKind,
    pub label: String,
    /// Action reported on click: `action`, then `role`, then empty.
    pub action: String,
    pub role: Option<String>,
    pub tooltip: Option<String>,
    pub accelerator: Option<String>,
    pub enabled: bool,
    pub checked: bool,
    pub hidden: bool,
    pub submenu: Vec<MenuNode>,
}

impl MenuNode {
    pub fn separator() -> Self {
        Self {
            kind: NodeKind::Separator,
            label: String::new(),
            action: String::new(),
            role: None,
            tooltip: None,
            accelerator: None,
            enabled: false,
            checked: false,
            hidden: false,
            submenu: Vec::new(),
        }
    }

    pub fn item(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Normal,
            label: label.into(),
            action: action.into(),
            enabled: true,
            ..Self::separator()
        }
    }

    /// Non-interactive row shown when nothing usable was supplied.
    pub fn placeholder() -> Self {
        Self {
            enabled: false,
            ..Self::item(PLACEHOLDER_LABEL, "")
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.kind, NodeKind::Normal | NodeKind::Checkbox)
    }
}

/// Wire shape of one entry. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNode {
    #[serde(rename = "type")]
    kind: Option<String>,
    label: Option<String>,
    action: Option<String>,
    role: Option<String>,
    tooltip: Option<String>,
    accelerator: Option<String>,
    enabled: Option<bool>,
    checked: Option<bool>,
    hidden: Option<bool>,
    submenu: Option<Vec<Value>>,
}

/// Parse a menu tree. Never fails: if no usable entry is found the result
/// is a single placeholder row, since some platforms reject empty menus.
pub fn parse_menu(json: &str) -> Vec<MenuNode> {
    let nodes = match serde_json::from_str::<Value>(json) {
        Ok(value) => parse_entries(entries_of(value)),
        Err(e) => {
            debug!(error = %e, "menu json unreadable");
            Vec::new()
        }
    };
    if nodes.is_empty() {
        vec![MenuNode::placeholder()]
    } else {
        nodes
    }
}

/// Accept a bare array, an object wrapping one, or a single entry.
fn entries_of(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            if map.contains_key("label") || map.contains_key("type") || map.contains_key("role") {
                return vec![Value::Object(map)];
            }
            map.into_iter()
                .find_map(|(_, v)| match v {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

fn parse_entries(values: Vec<Value>) -> Vec<MenuNode> {
    values.into_iter().filter_map(parse_entry).collect()
}

fn parse_entry(value: Value) -> Option<MenuNode> {
    let raw: RawNode = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "menu entry skipped");
            return None;
        }
    };

    let declared = raw.kind.as_deref().map(str::to_ascii_lowercase);
    if matches!(declared.as_deref(), Some("separator" | "divider")) {
        return Some(MenuNode::separator());
    }

    let submenu = raw.submenu.map(parse_entries).unwrap_or_default();
    let label = raw.label.filter(|l| !l.is_empty());

    // A bare "-" label is the shorthand divider.
    if label.as_deref() == Some("-") && submenu.is_empty() {
        return Some(MenuNode::separator());
    }

    let checked = raw.checked.unwrap_or(false);
    let kind = if !submenu.is_empty() {
        NodeKind::Submenu
    } else if declared.as_deref() == Some("checkbox") || checked {
        NodeKind::Checkbox
    } else {
        NodeKind::Normal
    };

    let role = raw.role.filter(|r| !r.is_empty());
    let label = label
        .or_else(|| role.clone())
        .unwrap_or_else(|| PLACEHOLDER_LABEL.to_string());
    let action = raw
        .action
        .filter(|a| !a.is_empty())
        .or_else(|| role.clone())
        .unwrap_or_default();

    Some(MenuNode {
        kind,
        label,
        action,
        role,
        tooltip: raw.tooltip,
        accelerator: raw.accelerator,
        enabled: raw.enabled.unwrap_or(true),
        checked,
        hidden: raw.hidden.unwrap_or(false),
        submenu,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_list_with_defaults() {
        let nodes = parse_menu(r#"[{"label":"Open","action":"open"},{"type":"divider"}]"#);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind, NodeKind::Normal);
        assert_eq!(nodes[0].action, "open");
        assert!(nodes[0].enabled);
        assert!(!nodes[0].hidden);
        assert_eq!(nodes[1].kind, NodeKind::Separator);
    }

    #[test]
    fn separator_and_divider_are_equivalent() {
        let nodes = parse_menu(r#"[{"type":"separator"},{"type":"Divider"},{"label":"-"}]"#);
        assert!(nodes.iter().all(|n| n.kind == NodeKind::Separator));
    }

    #[test]
    fn action_falls_back_to_role_then_empty() {
        let nodes = parse_menu(r#"[{"label":"Quit","role":"quit"},{"label":"Nothing"}]"#);
        assert_eq!(nodes[0].action, "quit");
        assert_eq!(nodes[1].action, "");
    }

    #[test]
    fn label_falls_back_to_role() {
        let nodes = parse_menu(r#"[{"role":"copy"}]"#);
        assert_eq!(nodes[0].label, "copy");
    }

    #[test]
    fn checked_entries_become_checkable() {
        let nodes = parse_menu(r#"[{"label":"Dark","checked":true},{"label":"Light","type":"checkbox"}]"#);
        assert_eq!(nodes[0].kind, NodeKind::Checkbox);
        assert!(nodes[0].checked);
        assert_eq!(nodes[1].kind, NodeKind::Checkbox);
        assert!(!nodes[1].checked);
    }

    #[test]
    fn nested_submenus_recurse() {
        let nodes = parse_menu(
            r#"[{"label":"File","submenu":[{"label":"New","action":"new"},{"label":"Recent","submenu":[{"label":"a"}]}]}]"#,
        );
        assert_eq!(nodes[0].kind, NodeKind::Submenu);
        assert_eq!(nodes[0].submenu.len(), 2);
        assert_eq!(nodes[0].submenu[1].kind, NodeKind::Submenu);
        assert_eq!(nodes[0].submenu[1].submenu[0].label, "a");
    }

    #[test]
    fn empty_submenu_is_a_plain_row() {
        let nodes = parse_menu(r#"[{"label":"File","submenu":[]}]"#);
        assert_eq!(nodes[0].kind, NodeKind::Normal);
    }

    #[test]
    fn wrapped_array_is_accepted() {
        let nodes = parse_menu(r#"{"items":[{"label":"A"},{"label":"B"}]}"#);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn unusable_input_yields_one_placeholder() {
        for input in ["", "null", "[]", "42", "{not json", r#"{"items":[]}"#, "[1, 2]"] {
            let nodes = parse_menu(input);
            assert_eq!(nodes.len(), 1, "input {input:?}");
            assert_eq!(nodes[0].label, PLACEHOLDER_LABEL);
            assert!(!nodes[0].enabled);
        }
    }

    #[test]
    fn disabled_and_hidden_flags_are_kept() {
        let nodes = parse_menu(r#"[{"label":"X","enabled":false,"hidden":true}]"#);
        assert!(!nodes[0].enabled);
        assert!(nodes[0].hidden);
    }
}
