use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use shoji_common::ViewId;
use tracing::debug;

use super::{BrowserId, ProcessMessage};
use crate::channel::Channel;
use crate::payload::Payload;

#[derive(Debug, Clone, Copy)]
struct Route {
    view: ViewId,
    sandboxed: bool,
}

/// Host-process table from engine browser ids to views.
#[derive(Debug, Default)]
pub struct HostRouter {
    routes: Mutex<HashMap<BrowserId, Route>>,
}

impl HostRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, browser: BrowserId, view: ViewId, sandboxed: bool) {
        self.table().insert(browser, Route { view, sandboxed });
    }

    /// Drop every browser routed to `view`.
    pub fn forget_view(&self, view: ViewId) {
        self.table().retain(|_, route| route.view != view);
    }

    pub fn clear(&self) {
        self.table().clear();
    }

    /// Resolve an incoming process message to its view and channel.
    ///
    /// Unknown browsers, unknown message names, and channels a sandboxed
    /// view may not use all resolve to `None`.
    pub fn route(
        &self,
        browser: BrowserId,
        message: &ProcessMessage,
    ) -> Option<(ViewId, Channel, Payload)> {
        let Some(route) = self.table().get(&browser).copied() else {
            debug!(browser, "process message from unknown browser ignored");
            return None;
        };
        let Some(channel) = message.channel() else {
            debug!(browser, name = %message.name, "unknown process message ignored");
            return None;
        };
        if route.sandboxed && !channel.available_when_sandboxed() {
            debug!(browser, %channel, "sandboxed browser used a blocked channel");
            return None;
        }
        Some((route.view, channel, Payload::copy_from(&message.argument)))
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<BrowserId, Route>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
