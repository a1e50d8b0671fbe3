//! Host windows and their event forwarding.

use std::time::Instant;

use shoji_common::{PlatformError, Point, Rect, ShellError, Size, WindowId};
use shoji_webview::Compositor;
use tracing::{debug, info, warn};
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::control::protocol::Notification;

use super::state::ShellState;

/// Requested window attributes; unset fields take the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec {
    pub frame: Option<Rect>,
    pub title: Option<String>,
    pub transparent: Option<bool>,
    pub decorations: Option<bool>,
}

/// A window that has an id but no native handle yet. Native windows can
/// only be built while the event loop hands out its `ActiveEventLoop`, so
/// requests are realized right after the dispatched work that made them.
#[derive(Debug)]
pub(crate) struct PendingWindow {
    pub id: WindowId,
    pub spec: WindowSpec,
}

pub(crate) struct ShellWindow {
    // Declared before `window` so views are dropped before their parent.
    pub compositor: Compositor,
    pub window: Window,
}

impl ShellWindow {
    pub fn logical_size(&self) -> Size {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        Size::new(size.width, size.height)
    }
}

impl ShellState {
    /// Reserve an id and queue the window for creation.
    pub fn request_window(&mut self, spec: WindowSpec) -> WindowId {
        let id = WindowId(self.ids.windows.next());
        debug!(window_id = id.0, "window requested");
        self.pending_windows.push(PendingWindow { id, spec });
        id
    }

    /// Build every queued window.
    pub fn realize_pending(&mut self, event_loop: &ActiveEventLoop) {
        for pending in std::mem::take(&mut self.pending_windows) {
            if let Err(e) = self.realize(event_loop, pending.id, &pending.spec) {
                warn!(window_id = pending.id.0, error = %e, "window creation failed");
                self.notifier.send(Notification::WindowCreationFailed {
                    window_id: pending.id,
                    error: e.to_string(),
                });
            }
        }
    }

    fn realize(
        &mut self,
        event_loop: &ActiveEventLoop,
        id: WindowId,
        spec: &WindowSpec,
    ) -> Result<(), ShellError> {
        let defaults = &self.config.window;
        let frame = spec
            .frame
            .unwrap_or_else(|| Rect::new(0.0, 0.0, defaults.width, defaults.height));
        let mut attrs = Window::default_attributes()
            .with_title(spec.title.clone().unwrap_or_else(|| defaults.title.clone()))
            .with_inner_size(LogicalSize::new(frame.width, frame.height))
            .with_transparent(spec.transparent.unwrap_or(defaults.transparent))
            .with_decorations(spec.decorations.unwrap_or(defaults.decorations));
        if spec.frame.is_some() {
            attrs = attrs.with_position(LogicalPosition::new(frame.x, frame.y));
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
        let winit_id = window.id();
        let size = frame.size();
        self.winit_ids.insert(winit_id, id);
        self.windows.insert(
            id,
            ShellWindow {
                compositor: Compositor::new(id, size),
                window,
            },
        );
        info!(window_id = id.0, width = size.width, height = size.height, "window created");
        Ok(())
    }

    /// The native window for `id`; unknown and pending ids give `None`.
    pub(crate) fn live_window(&self, id: WindowId) -> Option<&ShellWindow> {
        let window = self.windows.get(&id);
        if window.is_none() {
            debug!(window_id = id.0, "no native window for id");
        }
        window
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Result<&mut ShellWindow, ShellError> {
        let pending = &self.pending_windows;
        self.windows.get_mut(&id).ok_or_else(|| unknown_window(id, pending))
    }

    /// Retitle a window. A window that is still pending takes the title
    /// when it is built; unknown ids are ignored.
    pub fn set_window_title(&mut self, id: WindowId, title: &str) {
        if let Some(pending) = self.pending_windows.iter_mut().find(|p| p.id == id) {
            pending.spec.title = Some(title.to_string());
            return;
        }
        if let Some(window) = self.live_window(id) {
            window.window.set_title(title);
        }
    }

    /// Unknown ids are ignored.
    pub fn show_window(&mut self, id: WindowId) {
        if let Some(window) = self.live_window(id) {
            window.window.set_visible(true);
            window.window.focus_window();
        }
    }

    /// Close a window, removing its views first. Unknown ids are a no-op.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        let Some(mut window) = self.windows.remove(&id) else {
            debug!(window_id = id.0, "close of unknown window ignored");
            return false;
        };
        for view in window.compositor.clear() {
            self.view_windows.remove(&view);
            self.history.forget(view);
            self.browsers.forget_view(view);
        }
        self.winit_ids.remove(&window.window.id());
        drop(window);
        info!(window_id = id.0, "window closed");
        self.notifier.send(Notification::WindowClosed { window_id: id });
        if self.last_window_closed() {
            info!("last window closed");
            self.request_exit();
        }
        true
    }

    /// Handle a native window event.
    pub fn on_window_event(&mut self, winit_id: winit::window::WindowId, event: WindowEvent) {
        let Some(&id) = self.winit_ids.get(&winit_id) else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                self.close_window(id);
            }
            WindowEvent::Resized(physical) => {
                let Some(window) = self.windows.get_mut(&id) else {
                    return;
                };
                let logical = physical.to_logical::<f64>(window.window.scale_factor());
                let size = Size::new(logical.width, logical.height);
                if window.compositor.on_window_resized(size, Instant::now()) {
                    self.notifier.send(Notification::WindowResized {
                        window_id: id,
                        width: size.width,
                        height: size.height,
                    });
                }
            }
            WindowEvent::Moved(physical) => {
                let Some(window) = self.windows.get(&id) else {
                    return;
                };
                let logical = physical.to_logical::<f64>(window.window.scale_factor());
                self.notifier.send(Notification::WindowMoved {
                    window_id: id,
                    x: logical.x,
                    y: logical.y,
                });
            }
            WindowEvent::Focused(focused) => {
                self.notifier.send(Notification::WindowFocused {
                    window_id: id,
                    focused,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = self.windows.get_mut(&id) else {
                    return;
                };
                let logical = position.to_logical::<f64>(window.window.scale_factor());
                window.compositor.update_active_for_pointer(Point {
                    x: logical.x,
                    y: logical.y,
                });
            }
            _ => {}
        }
    }
}

fn unknown_window(id: WindowId, pending: &[PendingWindow]) -> ShellError {
    if pending.iter().any(|p| p.id == id) {
        PlatformError::NotSupported(format!("{id} is not created yet")).into()
    } else {
        ShellError::Other(format!("unknown {id}"))
    }
}
