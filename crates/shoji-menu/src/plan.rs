//! Menu trees planned into rows ready for a native menu.

use shoji_common::{MenuError, MenuItemId};

use crate::node::{MenuNode, NodeKind};
use crate::router::{ClickRouter, MenuOwner};

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Separator,
    Item { checkable: bool, checked: bool },
    Submenu(Vec<MenuRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuRow {
    /// Set for interactive rows only.
    pub click_id: Option<MenuItemId>,
    pub label: String,
    pub enabled: bool,
    pub hidden: bool,
    pub tooltip: Option<String>,
    pub accelerator: Option<String>,
    pub kind: RowKind,
}

/// Build one row per node, registering a click record for every
/// interactive row. Submenus are planned before their parent row.
pub fn plan_rows(nodes: &[MenuNode], owner: MenuOwner, router: &mut ClickRouter) -> Vec<MenuRow> {
    nodes.iter().map(|node| plan_row(node, owner, router)).collect()
}

fn plan_row(node: &MenuNode, owner: MenuOwner, router: &mut ClickRouter) -> MenuRow {
    let kind = match node.kind {
        NodeKind::Separator => RowKind::Separator,
        NodeKind::Submenu => RowKind::Submenu(plan_rows(&node.submenu, owner, router)),
        NodeKind::Normal => RowKind::Item {
            checkable: false,
            checked: false,
        },
        NodeKind::Checkbox => RowKind::Item {
            checkable: true,
            checked: node.checked,
        },
    };
    let click_id = node
        .is_interactive()
        .then(|| router.register(owner, &node.action));
    MenuRow {
        click_id,
        label: node.label.clone(),
        enabled: node.enabled,
        hidden: node.hidden,
        tooltip: node.tooltip.clone(),
        accelerator: node.accelerator.clone(),
        kind,
    }
}

/// Click ids of `rows`, submenus included.
pub fn click_ids(rows: &[MenuRow]) -> Vec<MenuItemId> {
    let mut ids = Vec::new();
    collect_click_ids(rows, &mut ids);
    ids
}

fn collect_click_ids(rows: &[MenuRow], ids: &mut Vec<MenuItemId>) {
    for row in rows {
        match &row.kind {
            RowKind::Submenu(children) => collect_click_ids(children, ids),
            _ => ids.extend(row.click_id),
        }
    }
}

/// Plan `nodes` as the new menu of `owner` and hand the rows to `build`.
///
/// Click records of the previous menu are released only after `build`
/// succeeds. When it fails the new records are dropped and the router is
/// left as it was, so the menu still on screen keeps working.
pub fn replan<T>(
    nodes: &[MenuNode],
    owner: MenuOwner,
    router: &mut ClickRouter,
    build: impl FnOnce(&[MenuRow]) -> Result<T, MenuError>,
) -> Result<(Vec<MenuRow>, T), MenuError> {
    let rows = plan_rows(nodes, owner, router);
    let fresh = click_ids(&rows);
    match build(&rows) {
        Ok(built) => {
            router.release_stale(owner, &fresh);
            Ok((rows, built))
        }
        Err(e) => {
            router.forget(&fresh);
            Err(e)
        }
    }
}
