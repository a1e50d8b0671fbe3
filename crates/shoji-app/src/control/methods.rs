//! Maps control methods onto the host API.

use serde_json::{json, Value};
use shoji_bridge::process::ProcessMessage;
use shoji_common::{Point, ShellError};
use shoji_menu::TrayOptions;
use tracing::debug;

use crate::shell::{Shell, ViewSpec, WindowSpec};

use super::params::*;

/// Run one control method and produce its JSON result.
pub fn handle(shell: &Shell, method: &str, params: Value) -> Result<Value, ShellError> {
    debug!(method, "control request");
    match method {
        // -- windows ----------------------------------------------------------
        "createWindow" => {
            let p: CreateWindowParams = decode(params)?;
            let id = shell.create_window(WindowSpec {
                frame: p.frame,
                title: p.title,
                transparent: p.transparent,
                decorations: p.decorations,
            })?;
            Ok(json!({ "windowId": id }))
        }
        "setWindowTitle" => {
            let p: WindowTitleParams = decode(params)?;
            shell.set_window_title(p.window_id, p.title)?;
            Ok(Value::Null)
        }
        "showWindow" => {
            let p: WindowParams = decode(params)?;
            shell.show_window(p.window_id)?;
            Ok(Value::Null)
        }
        "closeWindow" => {
            let p: WindowParams = decode(params)?;
            Ok(Value::Bool(shell.close_window(p.window_id)?))
        }

        // -- views ------------------------------------------------------------
        "createView" => {
            let p: CreateViewParams = decode(params)?;
            let mut spec = ViewSpec::new(p.window_id);
            spec.url = p.url;
            spec.html = p.html;
            spec.frame = p.frame;
            spec.full_size = p.full_size;
            spec.partition = p.partition;
            spec.renderer = p.renderer;
            spec.sandboxed = p.sandboxed;
            spec.transparent = p.transparent;
            spec.navigation_rules = p.navigation_rules.map(RulesParam::into_rules).unwrap_or_default();
            spec.persistent_script = p.persistent_script;
            spec.user_script = p.user_script;
            spec.browser = p.browser_id;
            let id = shell.create_view(spec)?;
            Ok(json!({ "viewId": id }))
        }
        "removeView" => {
            let p: ViewParams = decode(params)?;
            Ok(Value::Bool(shell.remove_view(p.view_id)?))
        }
        "loadURL" => {
            let p: LoadUrlParams = decode(params)?;
            shell.load_url(p.view_id, p.url)?;
            Ok(Value::Null)
        }
        "goBack" => {
            let p: ViewParams = decode(params)?;
            shell.go_back(p.view_id)?;
            Ok(Value::Null)
        }
        "goForward" => {
            let p: ViewParams = decode(params)?;
            shell.go_forward(p.view_id)?;
            Ok(Value::Null)
        }
        "reload" => {
            let p: ViewParams = decode(params)?;
            shell.reload(p.view_id)?;
            Ok(Value::Null)
        }
        "canGoBack" => {
            let p: ViewParams = decode(params)?;
            Ok(Value::Bool(shell.can_go_back(p.view_id)))
        }
        "canGoForward" => {
            let p: ViewParams = decode(params)?;
            Ok(Value::Bool(shell.can_go_forward(p.view_id)))
        }
        "evaluateScript" => {
            let p: ScriptParams = decode(params)?;
            shell.evaluate_script(p.view_id, p.script)?;
            Ok(Value::Null)
        }
        "evaluateScriptWithCompletion" => {
            let p: CompletionParams = decode(params)?;
            shell.evaluate_script_with_completion(p.view_id, p.id, p.script)?;
            Ok(Value::Null)
        }
        "injectPersistentScript" => {
            let p: ScriptParams = decode(params)?;
            shell.inject_persistent_script(p.view_id, p.script)?;
            Ok(Value::Null)
        }
        "replaceUserScript" => {
            let p: ScriptParams = decode(params)?;
            shell.replace_user_script(p.view_id, p.script)?;
            Ok(Value::Null)
        }
        "resizeView" => {
            let p: ResizeViewParams = decode(params)?;
            shell.resize_view(p.view_id, p.frame, p.masks)?;
            Ok(Value::Null)
        }
        "setHidden" => {
            let p: FlagParams = decode(params)?;
            shell.set_hidden(p.view_id, p.enabled)?;
            Ok(Value::Null)
        }
        "setPassthrough" => {
            let p: FlagParams = decode(params)?;
            shell.set_passthrough(p.view_id, p.enabled)?;
            Ok(Value::Null)
        }
        "toggleMirrorMode" => {
            let p: FlagParams = decode(params)?;
            shell.toggle_mirror_mode(p.view_id, p.enabled)?;
            Ok(Value::Null)
        }
        "sendToView" => {
            let p: SendToViewParams = decode(params)?;
            shell.send_to_view(p.view_id, p.payload)?;
            Ok(Value::Null)
        }
        "routeProcessMessage" => {
            let p: ProcessMessageParams = decode(params)?;
            let message = ProcessMessage {
                name: p.name,
                argument: p.argument,
            };
            Ok(Value::Bool(shell.route_process_message(p.browser, message)?))
        }

        // -- trays and menus --------------------------------------------------
        "createTray" => {
            let p: CreateTrayParams = decode(params)?;
            let id = shell.create_tray(TrayOptions {
                title: p.title,
                tooltip: p.tooltip,
                icon: p.icon.map(Into::into),
                menu: p.menu.as_ref().map(menu_json),
            })?;
            Ok(json!({ "trayId": id }))
        }
        "setTrayTitle" => {
            let p: TrayTitleParams = decode(params)?;
            shell.set_tray_title(p.tray_id, p.title)?;
            Ok(Value::Null)
        }
        "setTrayIcon" => {
            let p: TrayIconParams = decode(params)?;
            shell.set_tray_icon(p.tray_id, p.path.into())?;
            Ok(Value::Null)
        }
        "setTrayMenu" => {
            let p: TrayMenuParams = decode(params)?;
            shell.set_tray_menu(p.tray_id, menu_json(&p.menu))?;
            Ok(Value::Null)
        }
        "showContextMenu" => {
            let p: ContextMenuParams = decode(params)?;
            let position = match (p.x, p.y) {
                (Some(x), Some(y)) => Some(Point { x, y }),
                _ => None,
            };
            shell.show_context_menu(p.window_id, menu_json(&p.menu), position)?;
            Ok(Value::Null)
        }

        // -- lifecycle --------------------------------------------------------
        "quit" => {
            shell.quit()?;
            Ok(Value::Null)
        }

        other => Err(ShellError::Other(format!("unknown method: {other}"))),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use shoji_common::{DispatchError, ViewId};
    use shoji_config::ShellConfig;
    use shoji_dispatch::{job_queue, Dispatcher};

    use crate::notify::Notifier;
    use crate::shell::{install, HistoryBoard, ShellState};

    /// Shell whose UI thread is the test thread; nothing may be dispatched.
    fn local_shell() -> (Shell, HistoryBoard) {
        let (queue, _pump) = job_queue();
        let board = HistoryBoard::default();
        let dispatcher = Dispatcher::for_current_thread(Arc::new(queue));
        (Shell::new(dispatcher, board.clone()), board)
    }

    #[test]
    fn unknown_method_is_an_error() {
        let (shell, _) = local_shell();
        let err = handle(&shell, "frobnicate", Value::Null).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn history_queries_read_the_board() {
        let (shell, board) = local_shell();
        board.update(ViewId(2), true, false);
        assert_eq!(handle(&shell, "canGoBack", json!({"viewId": 2})).unwrap(), json!(true));
        assert_eq!(handle(&shell, "canGoForward", json!({"viewId": 2})).unwrap(), json!(false));
        assert_eq!(handle(&shell, "canGoBack", json!({"viewId": 9})).unwrap(), json!(false));
    }

    #[test]
    fn bad_params_are_reported() {
        let (shell, _) = local_shell();
        assert!(handle(&shell, "loadURL", json!({"viewId": 1})).is_err());
    }

    #[test]
    fn requests_run_on_the_ui_thread_until_quit() {
        let (shell_tx, shell_rx) = mpsc::channel();
        let ui = std::thread::spawn(move || {
            let (queue, pump) = job_queue();
            let board = HistoryBoard::default();
            install(ShellState::new(
                ShellConfig::default(),
                Vec::new(),
                Notifier::disconnected(),
                board.clone(),
            ));
            let dispatcher = Dispatcher::for_current_thread(Arc::new(queue));
            shell_tx.send(Shell::new(dispatcher.clone(), board)).unwrap();
            while !dispatcher.shutdown().is_shutting_down() {
                pump.run_one(Duration::from_millis(10));
            }
        });

        let shell = shell_rx.recv().unwrap();
        let created = handle(&shell, "createWindow", json!({"title": "Main"})).unwrap();
        assert_eq!(created, json!({"windowId": 1}));
        let second = handle(&shell, "createWindow", Value::Null).unwrap();
        assert_eq!(second["windowId"], json!(2));

        // A pending window keeps the title for when it is realized.
        let titled = handle(&shell, "setWindowTitle", json!({"windowId": 1, "title": "x"}));
        assert_eq!(titled.unwrap(), Value::Null);

        // Ids that no longer exist are ignored rather than reported.
        let stale = handle(&shell, "setWindowTitle", json!({"windowId": 99, "title": "x"}));
        assert_eq!(stale.unwrap(), Value::Null);
        let frame = json!({"x": 0, "y": 0, "width": 10, "height": 10});
        let stale = handle(&shell, "resizeView", json!({"viewId": 99, "frame": frame}));
        assert_eq!(stale.unwrap(), Value::Null);
        let stale = handle(&shell, "setTrayTitle", json!({"trayId": 99, "title": "x"}));
        assert_eq!(stale.unwrap(), Value::Null);
        let stale = handle(&shell, "showWindow", json!({"windowId": 99}));
        assert_eq!(stale.unwrap(), Value::Null);
        assert_eq!(handle(&shell, "removeView", json!({"viewId": 5})).unwrap(), json!(false));

        handle(&shell, "quit", Value::Null).unwrap();
        ui.join().unwrap();

        let err = shell.create_window(WindowSpec::default()).unwrap_err();
        assert!(matches!(err, ShellError::Dispatch(DispatchError::ShuttingDown)));
    }
}
