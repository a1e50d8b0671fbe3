//! JS injected into views and the host-side record of injected scripts.

use shoji_common::ViewId;

use crate::channel::Channel;

// =============================================================================
// BOOTSTRAP
// =============================================================================

/// Build the document-start script that installs the bridge globals.
///
/// It captures the engine's `window.ipc.postMessage` privately, installs
/// one frozen `{ postMessage(string) }` object per allowed channel, and
/// asks the host for the view's injected scripts. Sandboxed views get only
/// the event channel. The internal channel signs its envelopes with
/// `internal_token`, which page code never sees.
pub fn bootstrap_script(view: ViewId, sandboxed: bool, internal_token: &str) -> String {
    let token = js_string(internal_token);
    let globals: String = Channel::installed(sandboxed)
        .iter()
        .map(|c| {
            format!(
                "  define({}, channel({}, {}));\n",
                js_string(c.script_global()),
                js_string(c.as_str()),
                c == &Channel::Internal,
            )
        })
        .collect();

    format!(
        r#"(function () {{
  if (window.__shoji) {{ return; }}
  var ipc = window.ipc;
  if (!ipc || typeof ipc.postMessage !== "function") {{ return; }}
  var post = ipc.postMessage.bind(ipc);
  var token = {token};
  var listeners = {{}};
  function define(name, value) {{
    Object.defineProperty(window, name, {{
      value: Object.freeze(value),
      writable: false,
      enumerable: false,
      configurable: false
    }});
  }}
  function channel(name, signed) {{
    return {{
      postMessage: function (message) {{
        if (typeof message !== "string") {{
          throw new TypeError("postMessage expects a string");
        }}
        var envelope = {{ channel: name, payload: message }};
        if (signed) {{ envelope.token = token; }}
        post(JSON.stringify(envelope));
      }}
    }};
  }}
  define("__shoji", {{
    viewId: {view_id},
    sandboxed: {sandboxed},
    on: function (name, fn) {{
      (listeners[name] = listeners[name] || []).push(fn);
    }},
    receive: function (name, payload) {{
      (listeners[name] || []).forEach(function (fn) {{
        try {{ fn(payload); }} catch (e) {{ console.error(e); }}
      }});
    }}
  }});
{globals}  post(JSON.stringify({{ control: "scripts-ready", token: token }}));
}})();
"#,
        view_id = view.0,
    )
}

/// JS that hands a host message to listeners registered with
/// `window.__shoji.on(channel, fn)`.
pub fn js_deliver(channel: Channel, payload: &str) -> String {
    format!(
        "window.__shoji && window.__shoji.receive({}, {});",
        js_string(channel.as_str()),
        js_string(payload),
    )
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

// =============================================================================
// SCRIPT SET
// =============================================================================

/// Scripts a view runs on every new document.
///
/// At most one persistent script and one user script exist at a time.
/// Replacing the user script discards the previous one, so reloads never
/// accumulate stale user scripts. The persistent script always runs first.
///
/// The persistent script known when the view is built is baked into the
/// engine and runs at document start. Everything else is evaluated once
/// the bridge reports the document ready.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSet {
    persistent: Option<String>,
    user: Option<String>,
    baked: Option<String>,
}

fn non_empty(script: String) -> Option<String> {
    if script.trim().is_empty() {
        None
    } else {
        Some(script)
    }
}

impl ScriptSet {
    pub fn new(persistent: Option<String>, user: Option<String>) -> Self {
        Self {
            persistent: persistent.and_then(non_empty),
            user: user.and_then(non_empty),
            baked: None,
        }
    }

    /// Hand the current persistent script to the engine's document-start
    /// hook. Later documents no longer need it evaluated.
    pub fn bake_persistent(&mut self) -> Option<&str> {
        self.baked = self.persistent.clone();
        self.baked.as_deref()
    }

    pub fn inject_persistent(&mut self, script: String) {
        self.persistent = non_empty(script);
    }

    pub fn replace_user(&mut self, script: String) {
        self.user = non_empty(script);
    }

    pub fn persistent(&self) -> Option<&str> {
        self.persistent.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Scripts in injection order.
    pub fn ordered(&self) -> Vec<&str> {
        self.persistent
            .iter()
            .chain(self.user.iter())
            .map(String::as_str)
            .collect()
    }

    /// Scripts still to evaluate once a new document is ready.
    pub fn on_document_ready(&self) -> Vec<&str> {
        let persistent = self
            .persistent
            .as_deref()
            .filter(|script| self.baked.as_deref() != Some(*script));
        persistent
            .into_iter()
            .chain(self.user.as_deref())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_none() && self.user.is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================
