//! Declarative menus for trays, the application menu and context menus.
//!
//! A loosely-typed JSON tree is parsed into [`MenuNode`]s, planned into
//! [`MenuRow`]s with freshly allocated click ids, and rendered into native
//! menus. Clicks come back as ids and are resolved by the [`ClickRouter`].

pub mod icon;
pub mod native;
pub mod node;
pub mod plan;
pub mod router;
pub mod tray;

pub use node::{parse_menu, MenuNode, NodeKind};
pub use plan::{click_ids, plan_rows, replan, MenuRow, RowKind};
pub use router::{ClickHandler, ClickRecord, ClickRouter, MenuOwner};
pub use tray::{Tray, TrayOptions};
