//! Rendering planned rows into native menus.

use shoji_common::{MenuError, MenuItemId};
use tracing::debug;
use tray_icon::menu::accelerator::Accelerator;
use tray_icon::menu::{
    CheckMenuItem, IsMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu,
};

use crate::plan::{MenuRow, RowKind};
use crate::router::{native_id, parse_native_id};

/// Containers rows can be appended to.
trait RowSink {
    fn append_row(&self, item: &dyn IsMenuItem) -> Result<(), MenuError>;
}

impl RowSink for Menu {
    fn append_row(&self, item: &dyn IsMenuItem) -> Result<(), MenuError> {
        self.append(item).map_err(|e| MenuError::Native(e.to_string()))
    }
}

impl RowSink for Submenu {
    fn append_row(&self, item: &dyn IsMenuItem) -> Result<(), MenuError> {
        self.append(item).map_err(|e| MenuError::Native(e.to_string()))
    }
}

/// Build a native menu from planned rows. Hidden rows are left out.
pub fn build_menu(rows: &[MenuRow]) -> Result<Menu, MenuError> {
    let menu = Menu::new();
    append_rows(&menu, rows)?;
    Ok(menu)
}

fn append_rows(sink: &dyn RowSink, rows: &[MenuRow]) -> Result<(), MenuError> {
    for row in rows.iter().filter(|r| !r.hidden) {
        match &row.kind {
            RowKind::Separator => sink.append_row(&PredefinedMenuItem::separator())?,
            RowKind::Submenu(children) => {
                let submenu = Submenu::new(&row.label, row.enabled);
                append_rows(&submenu, children)?;
                sink.append_row(&submenu)?;
            }
            RowKind::Item { checkable, checked } => {
                let id = menu_id(row.click_id);
                let accelerator = parse_accelerator(row.accelerator.as_deref());
                if *checkable {
                    let item =
                        CheckMenuItem::with_id(id, &row.label, row.enabled, *checked, accelerator);
                    sink.append_row(&item)?;
                } else {
                    let item = MenuItem::with_id(id, &row.label, row.enabled, accelerator);
                    sink.append_row(&item)?;
                }
            }
        }
    }
    Ok(())
}

fn menu_id(click_id: Option<MenuItemId>) -> MenuId {
    MenuId::new(click_id.map(native_id).unwrap_or_default())
}

fn parse_accelerator(raw: Option<&str>) -> Option<Accelerator> {
    let raw = raw?;
    match raw.parse::<Accelerator>() {
        Ok(accelerator) => Some(accelerator),
        Err(e) => {
            debug!(accelerator = %raw, error = %e, "invalid accelerator dropped");
            None
        }
    }
}

/// Click id carried by a native menu event, if it came from a planned row.
pub fn click_id(event: &MenuEvent) -> Option<MenuItemId> {
    parse_native_id(event.id.as_ref())
}

/// Menu shown by a tray that was given none: a single disabled row with
/// the application name.
pub fn default_rows(app_name: &str) -> Vec<MenuRow> {
    vec![MenuRow {
        click_id: None,
        label: app_name.to_string(),
        enabled: false,
        hidden: false,
        tooltip: None,
        accelerator: None,
        kind: RowKind::Item {
            checkable: false,
            checked: false,
        },
    }]
}
