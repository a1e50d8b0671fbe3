//! Status-area items.

use std::path::PathBuf;

use shoji_common::{MenuError, TrayId};
use tracing::{debug, info, warn};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::icon::load_icon;
use crate::native::{build_menu, default_rows};
use crate::node::parse_menu;
use crate::plan::{plan_rows, replan, MenuRow};
use crate::router::{ClickRouter, MenuOwner};

const DEFAULT_ICON_SIZE: u32 = 22;

#[derive(Debug, Clone, Default)]
pub struct TrayOptions {
    pub title: Option<String>,
    pub tooltip: Option<String>,
    pub icon: Option<PathBuf>,
    /// Menu tree as JSON; absent means the default menu.
    pub menu: Option<String>,
}

/// One status-area item. When the platform has no status area the tray
/// still exists but every update is a no-op.
pub struct Tray {
    id: TrayId,
    native: Option<TrayIcon>,
    title: String,
    rows: Vec<MenuRow>,
}

impl Tray {
    pub fn create(
        id: TrayId,
        options: TrayOptions,
        app_name: &str,
        router: &mut ClickRouter,
    ) -> Self {
        let owner = MenuOwner::Tray(id);
        let rows = match &options.menu {
            Some(json) => plan_rows(&parse_menu(json), owner, router),
            None => default_rows(app_name),
        };

        let icon = options
            .icon
            .as_deref()
            .and_then(|path| match load_icon(path) {
                Ok(icon) => Some(icon),
                Err(e) => {
                    warn!(tray_id = id.0, error = %e, "tray icon unusable; using default");
                    None
                }
            })
            .or_else(default_icon);

        let mut builder = TrayIconBuilder::new().with_id(id.to_string());
        if let Some(icon) = icon {
            builder = builder.with_icon(icon);
        }
        if let Some(title) = &options.title {
            builder = builder.with_title(title);
        }
        if let Some(tooltip) = &options.tooltip {
            builder = builder.with_tooltip(tooltip);
        }
        match build_menu(&rows) {
            Ok(menu) => builder = builder.with_menu(Box::new(menu)),
            Err(e) => warn!(tray_id = id.0, error = %e, "tray menu not built"),
        }

        let native = build_guarded(id, || builder.build());

        Self {
            id,
            native,
            title: options.title.unwrap_or_default(),
            rows,
        }
    }

    pub fn id(&self) -> TrayId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    pub fn is_live(&self) -> bool {
        self.native.is_some()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if let Some(tray) = &self.native {
            tray.set_title(Some(title));
        }
    }

    /// Swap the icon. A file that cannot be loaded keeps the current icon.
    pub fn set_icon(&mut self, path: &std::path::Path) -> Result<(), MenuError> {
        let icon = match load_icon(path) {
            Ok(icon) => icon,
            Err(e) => {
                warn!(tray_id = self.id.0, error = %e, "tray icon unchanged");
                return Err(e);
            }
        };
        if let Some(tray) = &self.native {
            tray.set_icon(Some(icon))
                .map_err(|e| MenuError::Native(e.to_string()))?;
        }
        Ok(())
    }

    /// Replace the menu. Click records of the old menu are released once
    /// the new one is built; on failure the old menu stays in effect.
    pub fn set_menu(&mut self, json: &str, router: &mut ClickRouter) -> Result<(), MenuError> {
        let owner = MenuOwner::Tray(self.id);
        let (rows, menu) = replan(&parse_menu(json), owner, router, build_menu)?;
        self.rows = rows;
        if let Some(tray) = &self.native {
            tray.set_menu(Some(Box::new(menu)));
        }
        debug!(tray_id = self.id.0, rows = self.rows.len(), "tray menu replaced");
        Ok(())
    }

    /// Remove from the status area.
    pub fn remove(&mut self) {
        if self.native.take().is_some() {
            info!(tray_id = self.id.0, "tray removed");
        }
    }
}

/// Run the native build. A backend that panics instead of failing, as
/// some Linux status-area libraries do, leaves the tray inert.
fn build_guarded<T, E: std::fmt::Display>(
    id: TrayId,
    build: impl FnOnce() -> Result<T, E>,
) -> Option<T> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(build)) {
        Ok(Ok(native)) => {
            info!(tray_id = id.0, "tray created");
            Some(native)
        }
        Ok(Err(e)) => {
            warn!(tray_id = id.0, error = %e, "status area unavailable; tray inert");
            None
        }
        Err(_) => {
            warn!(tray_id = id.0, "tray backend panicked; tray inert");
            None
        }
    }
}

fn default_icon() -> Option<Icon> {
    let pixels = [128u8, 128, 128, 255].repeat((DEFAULT_ICON_SIZE * DEFAULT_ICON_SIZE) as usize);
    Icon::from_rgba(pixels, DEFAULT_ICON_SIZE, DEFAULT_ICON_SIZE).ok()
}

impl std::fmt::Debug for Tray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tray")
            .field("id", &self.id)
            .field("live", &self.native.is_some())
            .field("title", &self.title)
            .field("rows", &self.rows.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panicking_backend_leaves_tray_inert() {
        let built = build_guarded::<(), String>(TrayId(1), || panic!("no status area library"));
        assert!(built.is_none());
    }

    #[test]
    fn failing_backend_leaves_tray_inert() {
        let built = build_guarded::<(), String>(TrayId(1), || Err("no watcher".into()));
        assert!(built.is_none());
        assert_eq!(build_guarded::<u8, String>(TrayId(1), || Ok(7)), Some(7));
    }

    #[test]
    fn default_icon_is_valid() {
        assert!(default_icon().is_some());
    }
}
