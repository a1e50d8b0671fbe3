//! The host adapter: winit event loop, UI-thread registry and host API.
//!
//! - [`ShellApp`]: the event-loop handler; runs dispatched jobs, forwards
//!   window events, pumps views and menus
//! - [`ShellState`]: windows, views, trays and click records, owned by the
//!   UI thread
//! - [`Shell`]: the cloneable API the control server calls from its own
//!   thread

mod api;
mod context_menu;
mod handler;
mod scheduler;
mod state;
mod trays;
mod views;
mod windows;

pub use api::{HistoryBoard, Shell};
pub use handler::{InitialWindow, ShellApp};
pub use scheduler::ProxyScheduler;
pub use state::{install, uninstall, ShellState};
pub use views::ViewSpec;
pub use windows::WindowSpec;

use shoji_dispatch::Job;
use tray_icon::menu::MenuEvent;

/// User events carried by the winit loop.
pub enum ShellEvent {
    /// Work marshalled by the dispatcher.
    Dispatch(Job),
    /// A native menu row was activated.
    Menu(MenuEvent),
}

impl std::fmt::Debug for ShellEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellEvent::Dispatch(_) => f.write_str("Dispatch(..)"),
            ShellEvent::Menu(event) => f.debug_tuple("Menu").field(&event.id).finish(),
        }
    }
}
