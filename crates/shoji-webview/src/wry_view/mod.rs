//! System-webview implementation of [`View`] on top of wry.
//!
//! wry cannot remove initialization scripts once a webview is built, so only
//! the bridge bootstrap and the creation-time persistent script run at
//! document start. Each new document then posts a scripts-ready signal and
//! [`WryView::pump`] evaluates the rest of the [`ScriptSet`] in order, which
//! keeps user-script replacement exact.

mod bounds;
mod handlers;

use std::sync::{Arc, Mutex};

use shoji_bridge::{
    bootstrap_script, js_deliver, Channel, ChannelPolicy, EventNotification, ScriptSet,
    ViewCallbacks,
};
use shoji_common::{new_token, Rect, ViewError, ViewId};
use tracing::{debug, info, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::events::{PageLoadState, ViewEvent};
use crate::history::NavigationHistory;
use crate::view::{Partition, View, ViewOptions, ViewState};

pub use bounds::to_wry_rect;
use handlers::EventSink;

const BLANK_PAGE: &str = "<html><body></body></html>";

pub struct WryView {
    /// `None` once removed.
    webview: Option<WebView>,
    state: ViewState,
    scripts: ScriptSet,
    history: NavigationHistory,
    callbacks: ViewCallbacks,
    sink: EventSink,
}

impl WryView {
    /// Build the webview as a child of `window`, positioned at the
    /// options' frame.
    pub fn create<W: HasWindowHandle>(window: &W, options: ViewOptions) -> Result<Self, ViewError> {
        let id = options.id;
        let sink: EventSink = Arc::new(Mutex::new(Vec::new()));
        let policy = ChannelPolicy {
            sandboxed: options.sandboxed,
            internal_token: new_token(),
        };
        let bootstrap = bootstrap_script(id, options.sandboxed, &policy.internal_token);

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(&options.frame))
            .with_transparent(options.transparent)
            .with_devtools(options.devtools)
            .with_focused(false)
            .with_initialization_script(&bootstrap);

        let mut scripts = options.scripts.clone();
        if let Some(persistent) = scripts.bake_persistent() {
            builder = builder.with_initialization_script(persistent);
        }

        #[cfg(target_os = "windows")]
        {
            use wry::WebViewBuilderExtWindows;
            if !options.engine_args.is_empty() {
                builder = builder.with_additional_browser_args(&options.engine_args.join(" "));
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if !options.engine_args.is_empty() {
                debug!(view_id = id.0, "engine switches ignored by this platform's webview");
            }
        }

        if let Partition::Ephemeral(name) = &options.partition {
            debug!(view_id = id.0, partition = %name, "ephemeral partition");
            builder = builder.with_incognito(true);
        }

        builder = handlers::attach_ipc_handler(
            builder,
            id,
            policy,
            options.callbacks.clone(),
            Arc::clone(&sink),
        );
        builder = handlers::attach_navigation_handler(
            builder,
            id,
            options.navigation_rules.clone(),
            options.callbacks.clone(),
        );
        builder = handlers::attach_page_load_handler(builder, id, Arc::clone(&sink));
        builder = handlers::attach_title_handler(builder, id, Arc::clone(&sink));

        let initial_url = match (&options.url, &options.html) {
            (Some(url), _) => {
                builder = builder.with_url(url);
                url.clone()
            }
            (None, Some(html)) => {
                builder = builder.with_html(html);
                "about:blank".to_string()
            }
            (None, None) => {
                builder = builder.with_html(BLANK_PAGE);
                "about:blank".to_string()
            }
        };

        let webview = builder.build_as_child(window).map_err(|e| {
            warn!(view_id = id.0, error = %e, "webview construction failed");
            ViewError::CreationFailed(e.to_string())
        })?;

        let mut state = ViewState::new(id, options.window, options.frame, options.full_size);
        state.sandboxed = options.sandboxed;

        info!(view_id = id.0, url = %initial_url, sandboxed = options.sandboxed, "view created");

        Ok(Self {
            webview: Some(webview),
            state,
            scripts,
            history: NavigationHistory::new(),
            callbacks: options.callbacks,
            sink,
        })
    }

    fn webview(&self) -> Result<&WebView, ViewError> {
        self.webview.as_ref().ok_or(ViewError::Unusable(self.state.id))
    }

    fn eval(&self, js: &str) -> Result<(), ViewError> {
        self.webview()?
            .evaluate_script(js)
            .map_err(|e| ViewError::Engine(e.to_string()))
    }

    fn notify(&self, note: EventNotification) {
        self.callbacks
            .deliver(self.state.id, Channel::Event, note.to_payload());
    }

    /// Reflect passthrough and mirror flags in the page.
    fn apply_input_state(&self) -> Result<(), ViewError> {
        self.eval(&input_state_script(self.state.accepts_input()))
    }

    fn run_injected_scripts(&self) {
        for script in self.scripts.on_document_ready() {
            if let Err(e) = self.eval(script) {
                warn!(view_id = self.state.id.0, error = %e, "injected script failed");
            }
        }
        if let Err(e) = self.apply_input_state() {
            debug!(view_id = self.state.id.0, error = %e, "input state not applied");
        }
    }
}

fn input_state_script(accepts_input: bool) -> String {
    let value = if accepts_input { "" } else { "none" };
    format!(
        "document.documentElement && (document.documentElement.style.pointerEvents = \"{value}\");"
    )
}

impl View for WryView {
    fn state(&self) -> &ViewState {
        &self.state
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        self.webview()?
            .load_url(url)
            .map_err(|e| ViewError::Engine(e.to_string()))
    }

    fn load_html(&mut self, html: &str) -> Result<(), ViewError> {
        self.webview()?
            .load_html(html)
            .map_err(|e| ViewError::Engine(e.to_string()))
    }

    fn go_back(&mut self) -> Result<(), ViewError> {
        self.eval("history.back();")?;
        self.history.begin_back();
        Ok(())
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        self.eval("history.forward();")?;
        self.history.begin_forward();
        Ok(())
    }

    fn reload(&mut self) -> Result<(), ViewError> {
        self.eval("window.location.reload();")
    }

    fn remove(&mut self) {
        if self.webview.take().is_some() {
            info!(view_id = self.state.id.0, "view destroyed");
        }
    }

    fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    fn evaluate_script(&self, js: &str) -> Result<(), ViewError> {
        self.eval(js)
    }

    fn evaluate_script_with_completion(&self, id: &str, js: &str) -> Result<(), ViewError> {
        let view = self.state.id;
        let callbacks = self.callbacks.clone();
        let request_id = id.to_string();
        self.webview()?
            .evaluate_script_with_callback(js, move |raw| {
                let note = EventNotification::script_result(request_id.clone(), &raw);
                callbacks.deliver(view, Channel::Event, note.to_payload());
            })
            .map_err(|e| ViewError::Engine(e.to_string()))
    }

    fn inject_persistent_script(&mut self, js: &str) {
        self.scripts.inject_persistent(js.to_string());
    }

    fn replace_user_script(&mut self, js: &str) {
        self.scripts.replace_user(js.to_string());
    }

    fn scripts(&self) -> &ScriptSet {
        &self.scripts
    }

    fn resize(&mut self, frame: Rect, mask_descriptor: &str) -> Result<(), ViewError> {
        self.webview()?
            .set_bounds(to_wry_rect(&frame))
            .map_err(|e| ViewError::Engine(e.to_string()))?;
        self.state.set_geometry(frame, mask_descriptor);
        Ok(())
    }

    fn set_hidden(&mut self, hidden: bool) -> Result<(), ViewError> {
        self.webview()?
            .set_visible(!hidden)
            .map_err(|e| ViewError::Engine(e.to_string()))?;
        self.state.hidden = hidden;
        Ok(())
    }

    fn set_passthrough(&mut self, enabled: bool) -> Result<(), ViewError> {
        self.state.passthrough = enabled;
        self.apply_input_state()
    }

    fn toggle_mirror_mode(&mut self, enabled: bool) -> Result<(), ViewError> {
        self.state.mirror_mode = enabled;
        self.apply_input_state()
    }

    fn send(&self, channel: Channel, payload: &str) -> Result<(), ViewError> {
        self.eval(&js_deliver(channel, payload))
    }

    fn pump(&mut self) -> usize {
        let events = match self.sink.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => return 0,
        };
        let count = events.len();
        for event in events {
            match event {
                ViewEvent::ScriptsRequested => self.run_injected_scripts(),
                ViewEvent::PageLoad { state, url } => {
                    let note = match state {
                        PageLoadState::Started => {
                            self.history.load_started(&url);
                            EventNotification::LoadStarted { url }
                        }
                        PageLoadState::Finished => EventNotification::LoadFinished { url },
                    };
                    self.notify(note);
                }
                ViewEvent::TitleChanged { title } => {
                    self.notify(EventNotification::TitleChanged { title });
                }
            }
        }
        count
    }
}

impl Drop for WryView {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_state_script_toggles_pointer_events() {
        assert!(input_state_script(false).contains("\"none\""));
        assert!(input_state_script(true).contains("= \"\""));
    }
}
