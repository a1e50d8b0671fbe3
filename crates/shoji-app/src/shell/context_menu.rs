//! Popping up menus over a host window.

use shoji_common::{PlatformError, Point};
use tray_icon::menu::Menu;
use winit::window::Window;

/// Show `menu` at `position` (window-relative, logical), or at the pointer.
#[cfg(target_os = "windows")]
pub fn show(window: &Window, menu: &Menu, position: Option<Point>) -> Result<(), PlatformError> {
    use tray_icon::menu::ContextMenu;
    use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};

    let handle = window
        .window_handle()
        .map_err(|e| PlatformError::NotSupported(e.to_string()))?;
    match handle.as_raw() {
        RawWindowHandle::Win32(h) => {
            // Blocks until the menu closes; false means nothing was chosen.
            let selected = unsafe {
                menu.show_context_menu_for_hwnd(h.hwnd.get(), to_position(position))
            };
            if !selected {
                tracing::debug!("context menu closed without a selection");
            }
            Ok(())
        }
        _ => Err(PlatformError::NotSupported("not a Win32 window".into())),
    }
}

#[cfg(target_os = "macos")]
pub fn show(window: &Window, menu: &Menu, position: Option<Point>) -> Result<(), PlatformError> {
    use tray_icon::menu::ContextMenu;
    use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};

    let handle = window
        .window_handle()
        .map_err(|e| PlatformError::NotSupported(e.to_string()))?;
    match handle.as_raw() {
        RawWindowHandle::AppKit(h) => {
            unsafe {
                menu.show_context_menu_for_nsview(h.ns_view.as_ptr() as _, to_position(position));
            }
            Ok(())
        }
        _ => Err(PlatformError::NotSupported("not an AppKit window".into())),
    }
}

/// winit windows on Linux are not GTK windows, and the menu toolkit can
/// only pop up over a GTK parent.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn show(_window: &Window, _menu: &Menu, _position: Option<Point>) -> Result<(), PlatformError> {
    tracing::warn!("context menus need a GTK parent window; request ignored");
    Err(PlatformError::NotSupported(
        "context menus are not available on this platform".into(),
    ))
}

#[cfg(any(target_os = "windows", target_os = "macos"))]
fn to_position(position: Option<Point>) -> Option<tray_icon::menu::dpi::Position> {
    position.map(|p| tray_icon::menu::dpi::LogicalPosition::new(p.x, p.y).into())
}
