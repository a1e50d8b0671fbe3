//! Thread-safe host API.
//!
//! Every operation that touches a window, view, tray or menu runs on the UI
//! thread through the dispatcher and blocks until it is done. History
//! queries read a snapshot instead, so they never wait on the UI thread.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use shoji_bridge::process::{BrowserId, ProcessMessage};
use shoji_common::{Point, Rect, ShellError, TrayId, ViewId, WindowId};
use shoji_dispatch::Dispatcher;
use shoji_menu::TrayOptions;
use tracing::info;

use super::state::{with_state, ShellState};
use super::views::ViewSpec;
use super::windows::WindowSpec;

// =============================================================================
// HISTORY BOARD
// =============================================================================

/// Back/forward availability per view, published by the UI thread.
#[derive(Debug, Clone, Default)]
pub struct HistoryBoard {
    inner: Arc<Mutex<HashMap<ViewId, (bool, bool)>>>,
}

impl HistoryBoard {
    pub fn update(&self, view: ViewId, back: bool, forward: bool) {
        self.lock().insert(view, (back, forward));
    }

    pub fn forget(&self, view: ViewId) {
        self.lock().remove(&view);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// `(can_go_back, can_go_forward)`; unknown views can do neither.
    pub fn get(&self, view: ViewId) -> (bool, bool) {
        self.lock().get(&view).copied().unwrap_or((false, false))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ViewId, (bool, bool)>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// SHELL
// =============================================================================

/// Cloneable handle used by the control server and anything else off the
/// UI thread.
#[derive(Debug, Clone)]
pub struct Shell {
    dispatcher: Dispatcher,
    history: HistoryBoard,
}

impl Shell {
    pub fn new(dispatcher: Dispatcher, history: HistoryBoard) -> Self {
        Self {
            dispatcher,
            history,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn call<R, F>(&self, f: F) -> Result<R, ShellError>
    where
        F: FnOnce(&mut ShellState) -> Result<R, ShellError> + Send + 'static,
        R: Send + 'static,
    {
        self.dispatcher.run_on_ui_thread(move || with_state(f))?
    }

    fn on_view<F>(&self, view: ViewId, f: F) -> Result<(), ShellError>
    where
        F: FnOnce(&mut dyn shoji_webview::View) -> Result<(), ShellError> + Send + 'static,
    {
        self.call(move |state| state.with_view(view, f))
    }

    // -- windows --------------------------------------------------------------

    pub fn create_window(&self, spec: WindowSpec) -> Result<WindowId, ShellError> {
        self.call(move |state| Ok(state.request_window(spec)))
    }

    pub fn set_window_title(&self, window: WindowId, title: String) -> Result<(), ShellError> {
        self.call(move |state| {
            state.set_window_title(window, &title);
            Ok(())
        })
    }

    pub fn show_window(&self, window: WindowId) -> Result<(), ShellError> {
        self.call(move |state| {
            state.show_window(window);
            Ok(())
        })
    }

    pub fn close_window(&self, window: WindowId) -> Result<bool, ShellError> {
        self.call(move |state| Ok(state.close_window(window)))
    }

    // -- views ----------------------------------------------------------------

    pub fn create_view(&self, spec: ViewSpec) -> Result<ViewId, ShellError> {
        self.call(move |state| state.create_view(spec))
    }

    pub fn remove_view(&self, view: ViewId) -> Result<bool, ShellError> {
        self.call(move |state| Ok(state.remove_view(view)))
    }

    pub fn load_url(&self, view: ViewId, url: String) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.load_url(&url)?))
    }

    pub fn go_back(&self, view: ViewId) -> Result<(), ShellError> {
        self.on_view(view, |v| Ok(v.go_back()?))
    }

    pub fn go_forward(&self, view: ViewId) -> Result<(), ShellError> {
        self.on_view(view, |v| Ok(v.go_forward()?))
    }

    pub fn reload(&self, view: ViewId) -> Result<(), ShellError> {
        self.on_view(view, |v| Ok(v.reload()?))
    }

    pub fn can_go_back(&self, view: ViewId) -> bool {
        self.history.get(view).0
    }

    pub fn can_go_forward(&self, view: ViewId) -> bool {
        self.history.get(view).1
    }

    pub fn evaluate_script(&self, view: ViewId, js: String) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.evaluate_script(&js)?))
    }

    pub fn evaluate_script_with_completion(
        &self,
        view: ViewId,
        id: String,
        js: String,
    ) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.evaluate_script_with_completion(&id, &js)?))
    }

    pub fn inject_persistent_script(&self, view: ViewId, js: String) -> Result<(), ShellError> {
        self.on_view(view, move |v| {
            v.inject_persistent_script(&js);
            Ok(())
        })
    }

    pub fn replace_user_script(&self, view: ViewId, js: String) -> Result<(), ShellError> {
        self.on_view(view, move |v| {
            v.replace_user_script(&js);
            Ok(())
        })
    }

    pub fn resize_view(&self, view: ViewId, frame: Rect, masks: String) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.resize(frame, &masks)?))
    }

    pub fn set_hidden(&self, view: ViewId, hidden: bool) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.set_hidden(hidden)?))
    }

    pub fn set_passthrough(&self, view: ViewId, enabled: bool) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.set_passthrough(enabled)?))
    }

    pub fn toggle_mirror_mode(&self, view: ViewId, enabled: bool) -> Result<(), ShellError> {
        self.on_view(view, move |v| Ok(v.toggle_mirror_mode(enabled)?))
    }

    pub fn send_to_view(&self, view: ViewId, payload: String) -> Result<(), ShellError> {
        self.call(move |state| state.send_to_view(view, &payload))
    }

    pub fn route_process_message(
        &self,
        browser: BrowserId,
        message: ProcessMessage,
    ) -> Result<bool, ShellError> {
        self.call(move |state| Ok(state.route_process_message(browser, &message)))
    }

    // -- trays and menus ------------------------------------------------------

    pub fn create_tray(&self, options: TrayOptions) -> Result<TrayId, ShellError> {
        self.call(move |state| Ok(state.create_tray(options)))
    }

    pub fn set_tray_title(&self, tray: TrayId, title: String) -> Result<(), ShellError> {
        self.call(move |state| {
            state.set_tray_title(tray, &title);
            Ok(())
        })
    }

    pub fn set_tray_icon(&self, tray: TrayId, path: PathBuf) -> Result<(), ShellError> {
        self.call(move |state| state.set_tray_icon(tray, &path))
    }

    pub fn set_tray_menu(&self, tray: TrayId, json: String) -> Result<(), ShellError> {
        self.call(move |state| state.set_tray_menu(tray, &json))
    }

    pub fn show_context_menu(
        &self,
        window: WindowId,
        json: String,
        position: Option<Point>,
    ) -> Result<(), ShellError> {
        self.call(move |state| state.show_context_menu(window, &json, position))
    }

    // -- lifecycle ------------------------------------------------------------

    /// Ask the event loop to exit; later calls fail fast.
    pub fn quit(&self) -> Result<(), ShellError> {
        info!("quit requested");
        let result = self.call(|state| {
            state.request_exit();
            Ok(())
        });
        self.dispatcher.shutdown().initiate();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_board_defaults_to_no_history() {
        let board = HistoryBoard::default();
        assert_eq!(board.get(ViewId(1)), (false, false));
        board.update(ViewId(1), true, false);
        assert_eq!(board.get(ViewId(1)), (true, false));
        board.forget(ViewId(1));
        assert_eq!(board.get(ViewId(1)), (false, false));
    }

    #[test]
    fn history_board_is_shared_between_clones() {
        let board = HistoryBoard::default();
        let other = board.clone();
        other.update(ViewId(3), false, true);
        assert_eq!(board.get(ViewId(3)), (false, true));
    }
}
