//! UI-thread registry of windows, views and trays.
//!
//! The registry is installed once on the UI thread before the event loop
//! starts and is only ever touched there: dispatched work reaches it
//! through [`with_state`], and the event-loop handler does the same.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use shoji_bridge::process::HostRouter;
use shoji_common::{IdAllocator, PlatformError, ShellError, TrayId, ViewId, WindowId};
use shoji_config::ShellConfig;
use shoji_menu::{ClickHandler, ClickRouter, MenuOwner, Tray};
use tracing::debug;

use crate::control::protocol::{MenuSource, Notification};
use crate::notify::Notifier;

use super::api::HistoryBoard;
use super::windows::{PendingWindow, ShellWindow};

thread_local! {
    static SHELL: RefCell<Option<ShellState>> = const { RefCell::new(None) };
}

/// Install the registry for the calling (UI) thread.
pub fn install(state: ShellState) {
    SHELL.with(|slot| *slot.borrow_mut() = Some(state));
}

/// Remove the registry, e.g. to tear it down after the loop exits.
pub fn uninstall() -> Option<ShellState> {
    SHELL.with(|slot| slot.borrow_mut().take())
}

/// Run `f` against the registry of the calling thread.
pub fn with_state<R>(
    f: impl FnOnce(&mut ShellState) -> Result<R, ShellError>,
) -> Result<R, ShellError> {
    SHELL.with(|slot| {
        let mut guard = slot
            .try_borrow_mut()
            .map_err(|_| ShellError::Other("shell registry re-entered".into()))?;
        match guard.as_mut() {
            Some(state) => f(state),
            None => Err(PlatformError::NotSupported("no shell registry on this thread".into()).into()),
        }
    })
}

#[derive(Debug, Default)]
pub(crate) struct Ids {
    pub windows: IdAllocator,
    pub views: IdAllocator,
    pub trays: IdAllocator,
}

pub struct ShellState {
    pub(crate) config: ShellConfig,
    /// Engine switches resolved from config and `build.json`.
    pub(crate) engine_args: Vec<String>,
    pub(crate) notifier: Notifier,
    pub(crate) ids: Ids,
    pub(crate) windows: HashMap<WindowId, ShellWindow>,
    pub(crate) winit_ids: HashMap<winit::window::WindowId, WindowId>,
    pub(crate) pending_windows: Vec<PendingWindow>,
    pub(crate) view_windows: HashMap<ViewId, WindowId>,
    /// Renderer-subprocess browsers and the views they back.
    pub(crate) browsers: HostRouter,
    pub(crate) trays: HashMap<TrayId, Tray>,
    pub(crate) router: ClickRouter,
    pub(crate) history: HistoryBoard,
    pub(crate) exit_requested: bool,
}

impl ShellState {
    pub fn new(
        config: ShellConfig,
        engine_args: Vec<String>,
        notifier: Notifier,
        history: HistoryBoard,
    ) -> Self {
        let mut router = ClickRouter::new();
        router.set_handler(
            MenuOwner::Application,
            click_forwarder(&notifier, MenuSource::Application),
        );
        router.set_handler(MenuOwner::Context, click_forwarder(&notifier, MenuSource::Context));

        Self {
            config,
            engine_args,
            notifier,
            ids: Ids::default(),
            windows: HashMap::new(),
            winit_ids: HashMap::new(),
            pending_windows: Vec::new(),
            view_windows: HashMap::new(),
            browsers: HostRouter::new(),
            trays: HashMap::new(),
            router,
            history,
            exit_requested: false,
        }
    }

    pub fn request_exit(&mut self) {
        debug!("exit requested");
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Whether the loop should end now that a window closed.
    pub(crate) fn last_window_closed(&self) -> bool {
        let keep_alive = self.config.window.keep_alive_with_tray && !self.trays.is_empty();
        self.windows.is_empty() && self.pending_windows.is_empty() && !keep_alive
    }

    /// Destroy every view, window and tray, views first.
    pub fn teardown(&mut self) {
        for window in self.windows.values_mut() {
            window.compositor.clear();
        }
        self.windows.clear();
        self.winit_ids.clear();
        self.view_windows.clear();
        self.browsers.clear();
        for tray in self.trays.values_mut() {
            tray.remove();
        }
        self.trays.clear();
        self.history.clear();
    }
}

pub(crate) fn click_forwarder(notifier: &Notifier, source: MenuSource) -> ClickHandler {
    let notifier = notifier.clone();
    Arc::new(move |owner: MenuOwner, action: &str| {
        let tray_id = match owner {
            MenuOwner::Tray(id) => Some(id),
            MenuOwner::Application | MenuOwner::Context => None,
        };
        notifier.send(Notification::MenuClicked {
            source,
            tray_id,
            action: action.to_string(),
        });
    })
}

impl std::fmt::Debug for ShellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellState")
            .field("windows", &self.windows.len())
            .field("pending_windows", &self.pending_windows.len())
            .field("views", &self.view_windows.len())
            .field("trays", &self.trays.len())
            .field("exit_requested", &self.exit_requested)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ShellState {
        ShellState::new(
            ShellConfig::default(),
            Vec::new(),
            Notifier::disconnected(),
            HistoryBoard::default(),
        )
    }

    #[test]
    fn with_state_without_registry_fails() {
        std::thread::spawn(|| {
            let err = with_state(|_| Ok(())).unwrap_err();
            assert!(matches!(err, ShellError::Platform(_)));
        })
        .join()
        .unwrap();
    }

    #[test]
    fn with_state_reaches_installed_registry() {
        std::thread::spawn(|| {
            install(state());
            with_state(|s| {
                s.request_exit();
                Ok(())
            })
            .unwrap();
            assert!(with_state(|s| Ok(s.exit_requested())).unwrap());
            assert!(uninstall().is_some());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn nested_access_is_refused_not_panicking() {
        std::thread::spawn(|| {
            install(state());
            let inner = with_state(|_| Ok(with_state(|_| Ok(())))).unwrap();
            assert!(matches!(inner, Err(ShellError::Other(_))));
            uninstall();
        })
        .join()
        .unwrap();
    }

    #[test]
    fn empty_shell_exits_when_last_window_closes() {
        assert!(state().last_window_closed());
    }

    #[test]
    fn context_clicks_are_forwarded() {
        let (notifier, mut rx) = Notifier::channel();
        let mut s = ShellState::new(ShellConfig::default(), Vec::new(), notifier, HistoryBoard::default());
        let id = s.router.register(MenuOwner::Context, "copy");
        assert!(s.router.dispatch(id));
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::MenuClicked {
                source: MenuSource::Context,
                tray_id: None,
                action: "copy".into()
            }
        );
    }

    #[test]
    fn process_messages_reach_the_backing_view() {
        use shoji_bridge::process::ProcessMessage;
        use shoji_bridge::Channel;

        let (notifier, mut rx) = Notifier::channel();
        let s = ShellState::new(ShellConfig::default(), Vec::new(), notifier, HistoryBoard::default());
        s.browsers.register(7, ViewId(3), true);

        let event = ProcessMessage {
            name: "EventBridgeMessage".into(),
            argument: "{\"ready\":true}".into(),
        };
        assert!(s.route_process_message(7, &event));
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::BridgeMessage {
                view_id: ViewId(3),
                channel: Channel::Event,
                payload: "{\"ready\":true}".into()
            }
        );

        let user = ProcessMessage {
            name: "UserBridgeMessage".into(),
            argument: "x".into(),
        };
        assert!(!s.route_process_message(7, &user));
        assert!(!s.route_process_message(8, &event));
        assert!(rx.try_recv().is_err());
    }
}
