//! Typed parameters of control methods.

use serde::Deserialize;
use serde_json::Value;
use shoji_bridge::process::BrowserId;
use shoji_bridge::NavigationRules;
use shoji_common::{Rect, ShellError, TrayId, ViewId, WindowId};

/// Decode a request's params, treating `null` as `{}`.
pub fn decode<T: for<'de> Deserialize<'de>>(params: Value) -> Result<T, ShellError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    Ok(serde_json::from_value(params)?)
}

/// Menus may arrive as a JSON tree or as a string holding one.
pub fn menu_json(menu: &Value) -> String {
    match menu {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWindowParams {
    pub frame: Option<Rect>,
    pub title: Option<String>,
    pub transparent: Option<bool>,
    pub decorations: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowParams {
    pub window_id: WindowId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTitleParams {
    pub window_id: WindowId,
    pub title: String,
}

/// Navigation rules as a list or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RulesParam {
    List(Vec<String>),
    Text(String),
}

impl RulesParam {
    pub fn into_rules(self) -> NavigationRules {
        match self {
            RulesParam::List(list) => NavigationRules::new(list),
            RulesParam::Text(text) => NavigationRules::parse_list(&text),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewParams {
    pub window_id: WindowId,
    pub url: Option<String>,
    pub html: Option<String>,
    pub frame: Option<Rect>,
    #[serde(default = "default_true")]
    pub full_size: bool,
    pub partition: Option<String>,
    pub renderer: Option<String>,
    #[serde(default)]
    pub sandboxed: bool,
    #[serde(default)]
    pub transparent: bool,
    pub navigation_rules: Option<RulesParam>,
    pub persistent_script: Option<String>,
    pub user_script: Option<String>,
    /// Renderer-subprocess browser backing the view, when there is one.
    pub browser_id: Option<BrowserId>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    pub view_id: ViewId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadUrlParams {
    pub view_id: ViewId,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptParams {
    pub view_id: ViewId,
    pub script: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionParams {
    pub view_id: ViewId,
    pub id: String,
    pub script: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeViewParams {
    pub view_id: ViewId,
    pub frame: Rect,
    #[serde(default)]
    pub masks: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagParams {
    pub view_id: ViewId,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendToViewParams {
    pub view_id: ViewId,
    pub payload: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTrayParams {
    pub title: Option<String>,
    pub tooltip: Option<String>,
    pub icon: Option<String>,
    pub menu: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayTitleParams {
    pub tray_id: TrayId,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayIconParams {
    pub tray_id: TrayId,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayMenuParams {
    pub tray_id: TrayId,
    pub menu: Value,
}

/// A message a renderer subprocess sent on behalf of `browser`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessMessageParams {
    pub browser: BrowserId,
    pub name: String,
    pub argument: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuParams {
    pub window_id: WindowId,
    pub menu: Value,
    pub x: Option<f64>,
    pub y: Option<f64>,
}
