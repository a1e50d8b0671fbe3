//! Tray and menu operations on the registry.

use std::path::Path;

use shoji_common::{Point, ShellError, TrayId, WindowId};
use shoji_menu::native::{build_menu, click_id};
use shoji_menu::{parse_menu, replan, MenuOwner, Tray, TrayOptions};
use tracing::debug;
use tray_icon::menu::MenuEvent;

use crate::control::protocol::MenuSource;

use super::context_menu;
use super::state::{click_forwarder, ShellState};

impl ShellState {
    pub fn create_tray(&mut self, options: TrayOptions) -> TrayId {
        let id = TrayId(self.ids.trays.next());
        self.router.set_handler(
            MenuOwner::Tray(id),
            click_forwarder(&self.notifier, MenuSource::Tray),
        );
        let tray = Tray::create(id, options, &self.config.app.name, &mut self.router);
        self.trays.insert(id, tray);
        id
    }

    fn live_tray(&mut self, id: TrayId) -> Option<&mut Tray> {
        let tray = self.trays.get_mut(&id);
        if tray.is_none() {
            debug!(tray_id = id.0, "request for unknown tray ignored");
        }
        tray
    }

    pub fn set_tray_title(&mut self, id: TrayId, title: &str) {
        if let Some(tray) = self.live_tray(id) {
            tray.set_title(title);
        }
    }

    pub fn set_tray_icon(&mut self, id: TrayId, path: &Path) -> Result<(), ShellError> {
        match self.live_tray(id) {
            Some(tray) => Ok(tray.set_icon(path)?),
            None => Ok(()),
        }
    }

    pub fn set_tray_menu(&mut self, id: TrayId, json: &str) -> Result<(), ShellError> {
        let Some(tray) = self.trays.get_mut(&id) else {
            debug!(tray_id = id.0, "request for unknown tray ignored");
            return Ok(());
        };
        Ok(tray.set_menu(json, &mut self.router)?)
    }

    /// Pop up a menu over a window. Rows from the previous context menu
    /// are released once the new menu is built.
    pub fn show_context_menu(
        &mut self,
        window: WindowId,
        json: &str,
        position: Option<Point>,
    ) -> Result<(), ShellError> {
        if self.live_window(window).is_none() {
            return Ok(());
        }
        let (_, menu) = replan(
            &parse_menu(json),
            MenuOwner::Context,
            &mut self.router,
            build_menu,
        )?;
        if let Some(target) = self.live_window(window) {
            context_menu::show(&target.window, &menu, position)?;
        }
        Ok(())
    }

    /// Route a native menu activation.
    pub fn on_menu_event(&mut self, event: &MenuEvent) {
        match click_id(event) {
            Some(id) => {
                self.router.dispatch(id);
            }
            None => debug!(menu_id = ?event.id, "menu event without a click record"),
        }
    }
}

