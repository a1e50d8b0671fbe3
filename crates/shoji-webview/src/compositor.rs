//! Per-window owner of embedded views.
//!
//! Views live in two tiers. Full-size views cover the window and follow
//! its size; overlay views keep the coordinates they were given and never
//! take part in window sizing.

use std::time::{Duration, Instant};

use shoji_common::{Point, Rect, Size, ViewError, ViewId, WindowId};
use tracing::{debug, info, warn};

use crate::mask::point_in_masks;
use crate::view::View;

/// Layering tier a view is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    FullSize,
    Overlay,
}

// =============================================================================
// RESIZE DEBOUNCE
// =============================================================================

/// Drops a window-resize notification that repeats the previous size
/// within [`ResizeDebounce::INTERVAL`].
#[derive(Debug, Clone, Default)]
pub struct ResizeDebounce {
    last: Option<(Size, Instant)>,
}

impl ResizeDebounce {
    pub const INTERVAL: Duration = Duration::from_millis(50);

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a resize to `size` at `now` should be applied.
    pub fn should_apply(&mut self, size: Size, now: Instant) -> bool {
        if let Some((prev, at)) = self.last {
            if prev == size && now.saturating_duration_since(at) < Self::INTERVAL {
                return false;
            }
        }
        self.last = Some((size, now));
        true
    }
}

// =============================================================================
// COMPOSITOR
// =============================================================================

pub struct Compositor {
    window: WindowId,
    /// Most recently added first; front is topmost.
    views: Vec<Box<dyn View>>,
    window_size: Size,
    /// Overlay container size, tracks the window for clipping only.
    overlay_size: Size,
    active: Option<ViewId>,
    debounce: ResizeDebounce,
}

impl Compositor {
    pub fn new(window: WindowId, window_size: Size) -> Self {
        Self {
            window,
            views: Vec::new(),
            window_size,
            overlay_size: window_size,
            active: None,
            debounce: ResizeDebounce::new(),
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    pub fn overlay_size(&self) -> Size {
        self.overlay_size
    }

    /// Size the overlay container reports to window layout. Always zero so
    /// overlay children never influence window auto-sizing.
    pub fn overlay_intrinsic_size(&self) -> Size {
        Size::ZERO
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// View ids from topmost to bottommost.
    pub fn ids(&self) -> Vec<ViewId> {
        self.views.iter().map(|v| v.id()).collect()
    }

    pub fn views(&self) -> impl Iterator<Item = &dyn View> {
        self.views.iter().map(|v| v.as_ref())
    }

    pub fn views_mut(&mut self) -> impl Iterator<Item = &mut (dyn View + 'static)> + '_ {
        self.views.iter_mut().map(|v| v.as_mut())
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: ViewId) -> Option<&dyn View> {
        self.position(id).map(|i| self.views[i].as_ref())
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut (dyn View + 'static)> {
        match self.position(id) {
            Some(i) => Some(self.views[i].as_mut()),
            None => None,
        }
    }

    pub fn tier_of(&self, id: ViewId) -> Option<Tier> {
        self.get(id).map(|v| tier_for(v.state().full_size))
    }

    fn position(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|v| v.id() == id)
    }

    /// Take ownership of `view` and place it on top at `(x, y)`.
    ///
    /// Full-size views are stretched over the window instead. A view whose
    /// construction failed is refused.
    pub fn add_view(&mut self, mut view: Box<dyn View>, x: f64, y: f64) -> Result<Tier, ViewError> {
        let state = view.state();
        if state.creation_failed {
            return Err(ViewError::Unusable(state.id));
        }
        let id = state.id;
        let tier = tier_for(state.full_size);
        let frame = match tier {
            Tier::FullSize => Rect::covering(self.window_size),
            Tier::Overlay => Rect::new(x, y, state.frame.width, state.frame.height),
        };
        let mask = state.mask.clone();
        if let Err(e) = view.resize(frame, &mask) {
            warn!(view_id = id.0, error = %e, "initial placement failed");
        }
        self.views.insert(0, view);
        info!(window_id = self.window.0, view_id = id.0, ?tier, "view added");
        Ok(tier)
    }

    /// Destroy and forget a view. Returns false for unknown ids.
    pub fn remove_view(&mut self, id: ViewId) -> bool {
        match self.position(id) {
            Some(i) => {
                let mut view = self.views.remove(i);
                view.remove();
                if self.active == Some(id) {
                    self.active = None;
                }
                info!(window_id = self.window.0, view_id = id.0, "view removed");
                true
            }
            None => {
                debug!(window_id = self.window.0, view_id = id.0, "remove of unknown view ignored");
                false
            }
        }
    }

    /// Destroy every view, topmost first. Used when the window closes.
    pub fn clear(&mut self) -> Vec<ViewId> {
        let ids = self.ids();
        for mut view in self.views.drain(..) {
            view.remove();
        }
        self.active = None;
        ids
    }

    /// Stretch every full-size view over `size`; overlays keep their frames.
    pub fn resize_auto_sizing_views(&mut self, size: Size) {
        self.window_size = size;
        self.overlay_size = size;
        let frame = Rect::covering(size);
        for view in self.views.iter_mut().filter(|v| v.state().full_size) {
            let mask = view.state().mask.clone();
            if let Err(e) = view.resize(frame, &mask) {
                warn!(view_id = view.id().0, error = %e, "auto-resize failed");
            }
        }
    }

    /// Window-resize notification entry point, debounced.
    pub fn on_window_resized(&mut self, size: Size, now: Instant) -> bool {
        if !self.debounce.should_apply(size, now) {
            debug!(window_id = self.window.0, "duplicate resize ignored");
            return false;
        }
        self.resize_auto_sizing_views(size);
        true
    }

    /// Topmost view that takes pointer input at a window point.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        self.views
            .iter()
            .map(|v| v.state())
            .filter(|s| !s.hidden && !s.passthrough)
            .find(|s| s.frame.contains(point) && !point_in_masks(s.frame.to_local(point), &s.masks))
            .map(|s| s.id)
    }

    pub fn active(&self) -> Option<ViewId> {
        self.active
    }

    /// Make the view under the pointer the active one: it gets input, every
    /// other view is mirrored. With nothing under the pointer all views are
    /// mirrored. Returns whether the active view changed.
    pub fn update_active_for_pointer(&mut self, point: Point) -> bool {
        let hit = self.view_at(point);
        if hit == self.active {
            return false;
        }
        self.active = hit;
        for view in self.views.iter_mut() {
            let mirrored = Some(view.id()) != hit;
            if view.state().mirror_mode != mirrored {
                if let Err(e) = view.toggle_mirror_mode(mirrored) {
                    warn!(view_id = view.id().0, error = %e, "mirror toggle failed");
                }
            }
        }
        debug!(window_id = self.window.0, active = ?hit, "active view changed");
        true
    }
}

fn tier_for(full_size: bool) -> Tier {
    if full_size {
        Tier::FullSize
    } else {
        Tier::Overlay
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("window", &self.window)
            .field("views", &self.ids())
            .field("window_size", &self.window_size)
            .field("active", &self.active)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
