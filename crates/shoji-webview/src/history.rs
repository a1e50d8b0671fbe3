use tracing::trace;

/// Direction of a history traversal the host asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Back,
    Forward,
}

/// Best-effort session history, rebuilt from load-started notifications.
///
/// Engines report that a load started but not why, so traversals the host
/// requests are remembered and matched against the next load.
#[derive(Debug, Default, Clone)]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
    pending: Option<Traversal>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn begin_back(&mut self) {
        if self.can_go_back() {
            self.pending = Some(Traversal::Back);
        }
    }

    pub fn begin_forward(&mut self) {
        if self.can_go_forward() {
            self.pending = Some(Traversal::Forward);
        }
    }

    /// Record that a load of `url` started.
    ///
    /// A load of the entry next to the current one is a traversal, whether
    /// the host asked for it or the page did. A requested traversal that
    /// is followed by some other load is dropped.
    pub fn load_started(&mut self, url: &str) {
        let pending = self.pending.take();
        let back = self.index.checked_sub(1).and_then(|i| self.entries.get(i));
        let forward = self.entries.get(self.index + 1);
        let is_back = back.is_some_and(|u| u == url);
        let is_forward = forward.is_some_and(|u| u == url);

        if self.current() == Some(url) {
            // reload
        } else if is_back && pending != Some(Traversal::Forward) {
            self.index -= 1;
        } else if is_forward && pending != Some(Traversal::Back) {
            self.index += 1;
        } else {
            if pending.is_some() {
                trace!(?pending, "requested traversal superseded by a new load");
            }
            if !self.entries.is_empty() {
                self.entries.truncate(self.index + 1);
            }
            self.entries.push(url.to_string());
            self.index = self.entries.len() - 1;
        }
        trace!(index = self.index, len = self.entries.len(), "history updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_history_cannot_navigate() {
        let h = NavigationHistory::new();
        assert!(!h.can_go_back());
        assert!(!h.can_go_forward());
        assert_eq!(h.current(), None);
    }

    #[test]
    fn loads_build_back_stack() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        assert!(!h.can_go_back());
        h.load_started("b");
        assert!(h.can_go_back());
        assert!(!h.can_go_forward());
        assert_eq!(h.current(), Some("b"));
    }

    #[test]
    fn back_then_forward() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        h.load_started("b");
        h.begin_back();
        h.load_started("a");
        assert_eq!(h.current(), Some("a"));
        assert!(h.can_go_forward());

        h.begin_forward();
        h.load_started("b");
        assert_eq!(h.current(), Some("b"));
        assert!(!h.can_go_forward());
    }

    #[test]
    fn new_load_after_back_drops_forward_entries() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        h.load_started("b");
        h.begin_back();
        h.load_started("a");
        h.load_started("c");
        assert_eq!(h.current(), Some("c"));
        assert!(!h.can_go_forward());
        assert!(h.can_go_back());
    }

    #[test]
    fn reload_does_not_grow_history() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        h.load_started("a");
        assert!(!h.can_go_back());
    }

    #[test]
    fn back_at_start_is_ignored() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        h.begin_back();
        h.load_started("b");
        assert_eq!(h.current(), Some("b"));
        assert!(h.can_go_back());
    }

    #[test]
    fn page_initiated_back_is_a_traversal() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        h.load_started("b");
        h.load_started("a");
        assert_eq!(h.current(), Some("a"));
        assert!(!h.can_go_back());
        assert!(h.can_go_forward());

        h.load_started("b");
        assert_eq!(h.current(), Some("b"));
        assert!(!h.can_go_forward());
    }

    #[test]
    fn unanswered_back_does_not_capture_next_load() {
        let mut h = NavigationHistory::new();
        h.load_started("a");
        h.load_started("b");
        h.begin_back();
        h.load_started("c");
        assert_eq!(h.current(), Some("c"));
        assert!(h.can_go_back());
        assert!(!h.can_go_forward());

        // the stale request is gone, so a later load of "b" is a back step
        h.load_started("b");
        assert_eq!(h.current(), Some("b"));
        assert!(h.can_go_forward());
    }
}
