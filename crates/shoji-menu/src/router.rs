//! Click records and routing.

use std::collections::HashMap;
use std::sync::Arc;

use shoji_common::{IdAllocator, MenuItemId, TrayId};
use tracing::debug;

/// Menu surface a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOwner {
    Tray(TrayId),
    Application,
    Context,
}

/// Receives the resolved action of a clicked row.
pub type ClickHandler = Arc<dyn Fn(MenuOwner, &str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    pub owner: MenuOwner,
    pub action: String,
}

/// Maps click ids to the owner and action of the row that was built for
/// them, and each owner to its single handler. Lives on the UI thread.
#[derive(Default)]
pub struct ClickRouter {
    ids: IdAllocator,
    records: HashMap<MenuItemId, ClickRecord>,
    handlers: HashMap<MenuOwner, ClickHandler>,
}

impl ClickRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh click id for a row.
    pub fn register(&mut self, owner: MenuOwner, action: &str) -> MenuItemId {
        let id = MenuItemId(self.ids.next());
        self.records.insert(
            id,
            ClickRecord {
                owner,
                action: action.to_string(),
            },
        );
        id
    }

    pub fn set_handler(&mut self, owner: MenuOwner, handler: ClickHandler) {
        self.handlers.insert(owner, handler);
    }

    /// Forget the rows of `owner` except `keep`, once a rebuilt menu has
    /// replaced the old one.
    pub fn release_stale(&mut self, owner: MenuOwner, keep: &[MenuItemId]) {
        self.records
            .retain(|id, r| r.owner != owner || keep.contains(id));
    }

    /// Forget specific rows, e.g. ones planned for a menu that was never
    /// built.
    pub fn forget(&mut self, ids: &[MenuItemId]) {
        for id in ids {
            self.records.remove(id);
        }
    }

    pub fn lookup(&self, id: MenuItemId) -> Option<&ClickRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Route a click to its owner's handler. Returns whether a handler ran.
    pub fn dispatch(&self, id: MenuItemId) -> bool {
        let Some(record) = self.records.get(&id) else {
            debug!(item_id = id.0, "click on unknown menu row");
            return false;
        };
        match self.handlers.get(&record.owner) {
            Some(handler) => {
                handler(record.owner, &record.action);
                true
            }
            None => {
                debug!(item_id = id.0, owner = ?record.owner, "no click handler bound");
                false
            }
        }
    }
}

/// Native menu ids carry the click id as decimal text.
pub fn native_id(id: MenuItemId) -> String {
    id.0.to_string()
}

pub fn parse_native_id(raw: &str) -> Option<MenuItemId> {
    raw.parse().ok().map(MenuItemId)
}

impl std::fmt::Debug for ClickRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickRouter")
            .field("records", &self.records.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording(log: &Arc<Mutex<Vec<(MenuOwner, String)>>>) -> ClickHandler {
        let log = Arc::clone(log);
        Arc::new(move |owner: MenuOwner, action: &str| {
            log.lock().unwrap().push((owner, action.to_string()));
        })
    }

    #[test]
    fn ids_are_fresh() {
        let mut router = ClickRouter::new();
        let a = router.register(MenuOwner::Application, "a");
        let b = router.register(MenuOwner::Application, "a");
        assert_ne!(a, b);
    }

    #[test]
    fn dispatch_reaches_owner_handler_with_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = ClickRouter::new();
        let tray = MenuOwner::Tray(TrayId(1));
        router.set_handler(tray, recording(&log));
        let id = router.register(tray, "open");

        assert!(router.dispatch(id));
        assert_eq!(*log.lock().unwrap(), vec![(tray, "open".to_string())]);
    }

    #[test]
    fn handlers_are_per_owner() {
        let tray_log = Arc::new(Mutex::new(Vec::new()));
        let app_log = Arc::new(Mutex::new(Vec::new()));
        let mut router = ClickRouter::new();
        let tray = MenuOwner::Tray(TrayId(2));
        router.set_handler(tray, recording(&tray_log));
        router.set_handler(MenuOwner::Application, recording(&app_log));

        let id = router.register(MenuOwner::Application, "about");
        router.dispatch(id);
        assert!(tray_log.lock().unwrap().is_empty());
        assert_eq!(app_log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_or_unhandled_clicks_are_ignored() {
        let mut router = ClickRouter::new();
        assert!(!router.dispatch(MenuItemId(99)));
        let id = router.register(MenuOwner::Context, "x");
        assert!(!router.dispatch(id));
    }

    #[test]
    fn release_stale_drops_only_that_owners_old_rows() {
        let mut router = ClickRouter::new();
        let tray = MenuOwner::Tray(TrayId(1));
        let other = router.register(MenuOwner::Application, "a");
        let old = router.register(tray, "b");
        let fresh = router.register(tray, "c");
        router.release_stale(tray, &[fresh]);
        assert!(router.lookup(other).is_some());
        assert!(router.lookup(old).is_none());
        assert!(router.lookup(fresh).is_some());
    }

    #[test]
    fn forget_removes_listed_rows() {
        let mut router = ClickRouter::new();
        let a = router.register(MenuOwner::Context, "a");
        let b = router.register(MenuOwner::Context, "b");
        router.forget(&[a]);
        assert!(router.lookup(a).is_none());
        assert!(router.lookup(b).is_some());
    }

    #[test]
    fn native_ids_round_trip() {
        assert_eq!(parse_native_id(&native_id(MenuItemId(12))), Some(MenuItemId(12)));
        assert_eq!(parse_native_id("item-12"), None);
    }
}
