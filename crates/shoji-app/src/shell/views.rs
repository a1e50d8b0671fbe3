//! View operations on the registry.

use shoji_bridge::process::{BrowserId, ProcessMessage};
use shoji_bridge::{Channel, NavigationRules, ScriptSet};
use shoji_common::{Rect, ShellError, ViewId, WindowId};
use shoji_webview::{create_view, Partition, Renderer, View, ViewOptions};
use tracing::{debug, info};

use super::state::ShellState;

/// A view creation request.
#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub window: WindowId,
    pub url: Option<String>,
    pub html: Option<String>,
    /// Required for overlay views; full-size views cover the window.
    pub frame: Option<Rect>,
    pub full_size: bool,
    pub partition: Option<String>,
    pub renderer: Option<String>,
    pub sandboxed: bool,
    pub transparent: bool,
    /// Rules added after the configured ones, so they take precedence.
    pub navigation_rules: NavigationRules,
    pub persistent_script: Option<String>,
    pub user_script: Option<String>,
    /// Renderer-subprocess browser whose messages belong to this view.
    pub browser: Option<BrowserId>,
}

impl ViewSpec {
    /// A full-size view of `window` with nothing loaded.
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            url: None,
            html: None,
            frame: None,
            full_size: true,
            partition: None,
            renderer: None,
            sandboxed: false,
            transparent: false,
            navigation_rules: NavigationRules::default(),
            persistent_script: None,
            user_script: None,
            browser: None,
        }
    }
}

impl ShellState {
    fn navigation_rules(&self, extra: NavigationRules) -> NavigationRules {
        let nav = &self.config.navigation;
        let mut rules = NavigationRules::new(&nav.rules).with_default(nav.default_allow);
        rules.append(extra);
        rules
    }

    pub fn create_view(&mut self, spec: ViewSpec) -> Result<ViewId, ShellError> {
        let rules = self.navigation_rules(spec.navigation_rules);
        let callbacks = self.notifier.view_callbacks();
        let devtools = self.config.engine.devtools;
        let engine_args = self.engine_args.clone();
        let id = ViewId(self.ids.views.next());

        let window = self.window_mut(spec.window)?;
        let frame = spec
            .frame
            .unwrap_or_else(|| Rect::covering(window.logical_size()));

        let mut options = ViewOptions::new(id, spec.window, frame).full_size(spec.full_size);
        options.url = spec.url;
        options.html = spec.html;
        options.partition = Partition::parse(spec.partition.as_deref());
        options.renderer = spec.renderer.as_deref().map(Renderer::parse).unwrap_or_default();
        options.sandboxed = spec.sandboxed;
        options.transparent = spec.transparent;
        options.devtools = devtools;
        options.engine_args = engine_args;
        options.navigation_rules = rules;
        options.scripts = ScriptSet::new(spec.persistent_script, spec.user_script);
        options.callbacks = callbacks;

        let view = create_view(&window.window, options)?;
        let tier = window.compositor.add_view(view, frame.x, frame.y)?;
        self.view_windows.insert(id, spec.window);
        if let Some(browser) = spec.browser {
            self.browsers.register(browser, id, spec.sandboxed);
        }
        self.history.update(id, false, false);
        info!(view_id = id.0, window_id = spec.window.0, ?tier, "view attached");
        Ok(id)
    }

    /// Run `f` against a live view. Unknown ids are ignored.
    pub fn with_view(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn View) -> Result<(), ShellError>,
    ) -> Result<(), ShellError> {
        let view = self
            .view_windows
            .get(&id)
            .and_then(|window_id| self.windows.get_mut(window_id))
            .and_then(|window| window.compositor.get_mut(id));
        match view {
            Some(view) => f(view),
            None => {
                debug!(view_id = id.0, "request for unknown view ignored");
                Ok(())
            }
        }
    }

    /// Remove a view. Unknown ids are a no-op.
    pub fn remove_view(&mut self, id: ViewId) -> bool {
        let Some(window_id) = self.view_windows.remove(&id) else {
            debug!(view_id = id.0, "remove of unknown view ignored");
            return false;
        };
        self.history.forget(id);
        self.browsers.forget_view(id);
        self.windows
            .get_mut(&window_id)
            .is_some_and(|w| w.compositor.remove_view(id))
    }

    pub fn send_to_view(&mut self, id: ViewId, payload: &str) -> Result<(), ShellError> {
        self.with_view(id, |view| Ok(view.send(Channel::User, payload)?))
    }

    /// Deliver a message a renderer subprocess sent for `browser` to the
    /// handlers of the view it backs. Returns false when nothing took it.
    pub fn route_process_message(&self, browser: BrowserId, message: &ProcessMessage) -> bool {
        match self.browsers.route(browser, message) {
            Some((view, channel, payload)) => {
                self.notifier.view_callbacks().deliver(view, channel, payload);
                true
            }
            None => false,
        }
    }

    /// Drain engine events of every view and refresh the history board.
    pub fn pump_views(&mut self) -> usize {
        let mut handled = 0;
        for window in self.windows.values_mut() {
            for view in window.compositor.views_mut() {
                let n = view.pump();
                if n > 0 {
                    self.history
                        .update(view.id(), view.can_go_back(), view.can_go_forward());
                }
                handled += n;
            }
        }
        handled
    }
}
