mod cli;
mod control;
mod notify;
mod shell;

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shoji_config::{engine_flags, ShellConfig};
use shoji_dispatch::Dispatcher;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use crate::notify::Notifier;
use crate::shell::{
    install, uninstall, HistoryBoard, InitialWindow, ProxyScheduler, Shell, ShellApp, ShellEvent,
    ShellState, WindowSpec,
};

/// How long in-flight control requests get to observe shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        eprintln!(
            "\n--- shoji: panic on thread '{}' ---",
            thread.name().unwrap_or("<unnamed>")
        );
        default_hook(info);
    }));
}

/// Filter precedence: `--log-level`, then `RUST_LOG`, then the config file.
fn log_filter(cli_level: Option<&str>, config: &ShellConfig) -> EnvFilter {
    let config_level = config.logging.level.as_directive();
    match cli_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(config_level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
    }
}

fn main() -> ExitCode {
    install_panic_hook();

    let args = cli::parse();

    // Loading happens before logging so the file can set the level.
    let loaded = shoji_config::load_config(args.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // stdout carries the control protocol.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.log_level.as_deref(), &config))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("shoji v{} starting", env!("CARGO_PKG_VERSION"));
    match &loaded {
        Ok(_) => {
            if let Err(e) = shoji_config::validation::validate(&config) {
                tracing::warn!("config validation warning: {e}");
            }
        }
        Err(e) => tracing::warn!("config load failed, using defaults: {e}"),
    }

    #[cfg(target_os = "linux")]
    {
        if let Err(e) = gtk::init() {
            tracing::warn!(error = %e, "GTK init failed; tray and menus unavailable");
        }
    }

    let event_loop = match EventLoop::<ShellEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!(error = %e, "could not create the event loop");
            return ExitCode::FAILURE;
        }
    };

    let scheduler = ProxyScheduler::new(event_loop.create_proxy());
    let dispatcher = Dispatcher::for_current_thread(Arc::new(scheduler));

    let menu_proxy = Mutex::new(event_loop.create_proxy());
    tray_icon::menu::MenuEvent::set_event_handler(Some(move |event| {
        let sent = menu_proxy
            .lock()
            .map(|proxy| proxy.send_event(ShellEvent::Menu(event)).is_ok());
        if !matches!(sent, Ok(true)) {
            tracing::debug!("menu event after loop exit dropped");
        }
    }));

    let engine_args: Vec<String> = engine_flags::resolve(&config.engine)
        .iter()
        .map(|flag| flag.to_switch())
        .collect();
    if !engine_args.is_empty() {
        tracing::info!(flags = ?engine_args, "engine flags resolved");
    }

    let history = HistoryBoard::default();
    let shell = Shell::new(dispatcher, history.clone());

    let (notifier, notifications) = if args.no_control {
        (Notifier::disconnected(), None)
    } else {
        let (notifier, rx) = Notifier::channel();
        (notifier, Some(rx))
    };

    let initial = args.url.map(|url| InitialWindow {
        window: WindowSpec {
            title: args.title.clone(),
            ..WindowSpec::default()
        },
        url,
    });
    if initial.is_none() && args.no_control {
        tracing::warn!("no --url and no control process; nothing will be shown");
    }

    install(ShellState::new(config, engine_args, notifier, history));

    if let Some(rx) = notifications {
        if let Err(e) = control::server::spawn(shell.clone(), rx) {
            tracing::error!(error = %e, "control server could not start");
            return ExitCode::FAILURE;
        }
    }

    let dispatcher = shell.dispatcher().clone();
    let mut app = ShellApp::new(shell, initial);
    tracing::info!("entering event loop");
    let result = event_loop.run_app(&mut app);
    if let Some(mut state) = uninstall() {
        state.teardown();
    }
    // Jobs still queued were dropped with the loop; their callers now fail.
    dispatcher.shutdown().initiate();
    if !dispatcher.shutdown().wait_idle(SHUTDOWN_GRACE) {
        tracing::warn!(
            active = dispatcher.shutdown().active_operations(),
            "requests still in flight at exit"
        );
    }
    match result {
        Ok(()) => {
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "event loop error");
            ExitCode::FAILURE
        }
    }
}
