use shoji_bridge::{Channel, NavigationRules, ScriptSet, ViewCallbacks};
use shoji_common::{Rect, ViewError, ViewId, WindowId};
use tracing::warn;
use wry::raw_window_handle::HasWindowHandle;

use crate::mask;
use crate::wry_view::WryView;

// =============================================================================
// VIEW STATE
// =============================================================================

/// Attributes shared by every view implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub id: ViewId,
    pub window: WindowId,
    /// Auto-resizes with the window (full-size tier) instead of keeping
    /// explicit coordinates (overlay tier).
    pub full_size: bool,
    /// Pointer events are ignored.
    pub passthrough: bool,
    /// Input is disabled while the view is shown mirrored.
    pub mirror_mode: bool,
    pub hidden: bool,
    pub frame: Rect,
    /// Raw mask descriptor as last supplied.
    pub mask: String,
    pub masks: Vec<Rect>,
    pub sandboxed: bool,
    /// Native construction failed; the view must not join a compositor.
    pub creation_failed: bool,
}

impl ViewState {
    pub fn new(id: ViewId, window: WindowId, frame: Rect, full_size: bool) -> Self {
        Self {
            id,
            window,
            full_size,
            passthrough: false,
            mirror_mode: false,
            hidden: false,
            frame,
            mask: String::new(),
            masks: Vec::new(),
            sandboxed: false,
            creation_failed: false,
        }
    }

    /// Record a new frame and mask descriptor.
    pub fn set_geometry(&mut self, frame: Rect, mask_descriptor: &str) {
        self.frame = frame;
        if self.mask != mask_descriptor {
            self.mask = mask_descriptor.to_string();
            self.masks = mask::parse_masks(mask_descriptor);
        }
    }

    /// Whether input should reach the page content.
    pub fn accepts_input(&self) -> bool {
        !self.passthrough && !self.mirror_mode
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// One embedded rendering surface.
///
/// Every method except the history queries must be called on the UI
/// thread; the host adapter routes them through the dispatcher.
pub trait View {
    fn state(&self) -> &ViewState;

    fn id(&self) -> ViewId {
        self.state().id
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError>;
    fn load_html(&mut self, html: &str) -> Result<(), ViewError>;
    fn go_back(&mut self) -> Result<(), ViewError>;
    fn go_forward(&mut self) -> Result<(), ViewError>;
    fn reload(&mut self) -> Result<(), ViewError>;

    /// Destroy the native surface. Safe to call more than once.
    fn remove(&mut self);

    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;

    /// Fire-and-forget script evaluation.
    fn evaluate_script(&self, js: &str) -> Result<(), ViewError>;

    /// Evaluate `js`; the result arrives later on the event channel as a
    /// `scriptResult` notification tagged with `id`.
    fn evaluate_script_with_completion(&self, id: &str, js: &str) -> Result<(), ViewError>;

    /// Set the script that runs first on every new document.
    fn inject_persistent_script(&mut self, js: &str);

    /// Replace the user script; on the next document only the persistent
    /// script and this one run, in that order.
    fn replace_user_script(&mut self, js: &str);

    fn scripts(&self) -> &ScriptSet;

    fn resize(&mut self, frame: Rect, mask_descriptor: &str) -> Result<(), ViewError>;
    fn set_hidden(&mut self, hidden: bool) -> Result<(), ViewError>;
    fn set_passthrough(&mut self, enabled: bool) -> Result<(), ViewError>;

    /// Toggle input delivery only; geometry and tier are untouched.
    fn toggle_mirror_mode(&mut self, enabled: bool) -> Result<(), ViewError>;

    /// Deliver a host message to listeners in the page.
    fn send(&self, channel: Channel, payload: &str) -> Result<(), ViewError>;

    /// Process events queued by engine callbacks. Returns how many ran.
    fn pump(&mut self) -> usize;
}

// =============================================================================
// CREATION
// =============================================================================

/// Rendering engine selected per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Renderer {
    /// The platform's system webview.
    #[default]
    Native,
    /// Bundled multi-process engine.
    Cef,
}

impl Renderer {
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "cef" => Renderer::Cef,
            _ => Renderer::Native,
        }
    }

    /// The engine that will actually be used. No bundled engine is linked
    /// into this build, so `Cef` degrades to `Native`.
    pub fn resolve(self) -> Self {
        match self {
            Renderer::Cef => {
                warn!("bundled engine not available; using the system webview");
                Renderer::Native
            }
            Renderer::Native => Renderer::Native,
        }
    }
}

/// Storage partition for a view's cookies and caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    Persistent(String),
    Ephemeral(String),
}

impl Partition {
    /// `persist:<name>` (or no partition) is persistent; anything else is
    /// discarded when the view goes away.
    pub fn parse(partition: Option<&str>) -> Self {
        match partition {
            None | Some("") => Partition::Persistent("default".into()),
            Some(p) => match p.strip_prefix("persist:") {
                Some(name) => Partition::Persistent(name.to_string()),
                None => Partition::Ephemeral(p.to_string()),
            },
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Partition::Persistent(_))
    }
}

/// Everything a view creation request carries.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub id: ViewId,
    pub window: WindowId,
    pub url: Option<String>,
    pub html: Option<String>,
    pub frame: Rect,
    pub full_size: bool,
    pub partition: Partition,
    pub renderer: Renderer,
    pub sandboxed: bool,
    pub transparent: bool,
    pub devtools: bool,
    /// Extra engine command-line switches, e.g. `--disable-gpu`.
    pub engine_args: Vec<String>,
    pub navigation_rules: NavigationRules,
    pub scripts: ScriptSet,
    pub callbacks: ViewCallbacks,
}

impl ViewOptions {
    pub fn new(id: ViewId, window: WindowId, frame: Rect) -> Self {
        Self {
            id,
            window,
            url: None,
            html: None,
            frame,
            full_size: false,
            partition: Partition::parse(None),
            renderer: Renderer::Native,
            sandboxed: false,
            transparent: false,
            devtools: false,
            engine_args: Vec::new(),
            navigation_rules: NavigationRules::default(),
            scripts: ScriptSet::default(),
            callbacks: ViewCallbacks::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn full_size(mut self, full_size: bool) -> Self {
        self.full_size = full_size;
        self
    }
}

/// Build a view with the engine its options ask for.
pub fn create_view<W: HasWindowHandle>(
    window: &W,
    options: ViewOptions,
) -> Result<Box<dyn View>, ViewError> {
    match options.renderer.resolve() {
        Renderer::Native | Renderer::Cef => Ok(Box::new(WryView::create(window, options)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_prefix_decides_persistence() {
        assert_eq!(
            Partition::parse(Some("persist:main")),
            Partition::Persistent("main".into())
        );
        assert_eq!(
            Partition::parse(Some("scratch")),
            Partition::Ephemeral("scratch".into())
        );
        assert!(Partition::parse(None).is_persistent());
        assert!(Partition::parse(Some("")).is_persistent());
    }

    #[test]
    fn renderer_tag_parsing() {
        assert_eq!(Renderer::parse("CEF"), Renderer::Cef);
        assert_eq!(Renderer::parse("native"), Renderer::Native);
        assert_eq!(Renderer::parse("whatever"), Renderer::Native);
    }

    #[test]
    fn missing_engine_degrades_to_native() {
        assert_eq!(Renderer::Cef.resolve(), Renderer::Native);
    }

    #[test]
    fn geometry_reparses_masks_only_on_change() {
        let mut state = ViewState::new(ViewId(1), WindowId(1), Rect::default(), false);
        state.set_geometry(
            Rect::new(0.0, 0.0, 50.0, 50.0),
            r#"[{"x":0,"y":0,"width":5,"height":5}]"#,
        );
        assert_eq!(state.masks.len(), 1);
        state.set_geometry(Rect::new(1.0, 1.0, 50.0, 50.0), "");
        assert!(state.masks.is_empty());
        assert_eq!(state.frame.x, 1.0);
    }

    #[test]
    fn input_blocked_by_passthrough_or_mirror() {
        let mut state = ViewState::new(ViewId(1), WindowId(1), Rect::default(), true);
        assert!(state.accepts_input());
        state.mirror_mode = true;
        assert!(!state.accepts_input());
        state.mirror_mode = false;
        state.passthrough = true;
        assert!(!state.accepts_input());
    }
}
