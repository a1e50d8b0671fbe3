//! `ApplicationHandler` implementation for the winit event loop.

use shoji_common::ShellError;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

use super::api::Shell;
use super::state::{uninstall, with_state};
use super::views::ViewSpec;
use super::windows::WindowSpec;
use super::ShellEvent;

/// Interval at which GTK is pumped while the loop would otherwise sleep.
#[cfg(target_os = "linux")]
const GTK_PUMP_INTERVAL: std::time::Duration = std::time::Duration::from_millis(16);

/// Window and view opened at startup from the command line.
#[derive(Debug, Clone)]
pub struct InitialWindow {
    pub window: WindowSpec,
    pub url: String,
}

pub struct ShellApp {
    shell: Shell,
    initial: Option<InitialWindow>,
    started: bool,
}

impl ShellApp {
    pub fn new(shell: Shell, initial: Option<InitialWindow>) -> Self {
        Self {
            shell,
            initial,
            started: false,
        }
    }

    fn open_initial(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ShellError> {
        let Some(initial) = self.initial.take() else {
            return Ok(());
        };
        with_state(|state| {
            let window = state.request_window(initial.window);
            state.realize_pending(event_loop);
            let mut spec = ViewSpec::new(window);
            spec.url = Some(initial.url);
            state.create_view(spec)?;
            Ok(())
        })
    }

    fn log_failure(result: Result<(), ShellError>, what: &str) {
        if let Err(e) = result {
            warn!(error = %e, "{what} failed");
        }
    }
}

impl ApplicationHandler<ShellEvent> for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;
        info!("event loop running");
        if let Err(e) = self.open_initial(event_loop) {
            error!(error = %e, "initial window could not be opened");
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ShellEvent) {
        match event {
            ShellEvent::Dispatch(job) => {
                job();
                Self::log_failure(
                    with_state(|state| {
                        state.realize_pending(event_loop);
                        Ok(())
                    }),
                    "window realization",
                );
            }
            ShellEvent::Menu(menu_event) => {
                Self::log_failure(
                    with_state(|state| {
                        state.on_menu_event(&menu_event);
                        Ok(())
                    }),
                    "menu routing",
                );
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        Self::log_failure(
            with_state(|state| {
                state.on_window_event(window_id, event);
                Ok(())
            }),
            "window event",
        );
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        #[cfg(target_os = "linux")]
        {
            while gtk::events_pending() {
                gtk::main_iteration_do(false);
            }
        }

        let exit = with_state(|state| {
            state.pump_views();
            Ok(state.exit_requested())
        });
        match exit {
            Ok(true) => {
                info!("leaving event loop");
                self.shell.dispatcher().shutdown().initiate();
                event_loop.exit();
                return;
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "view pump failed"),
        }

        #[cfg(target_os = "linux")]
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            std::time::Instant::now() + GTK_PUMP_INTERVAL,
        ));
        #[cfg(not(target_os = "linux"))]
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shell.dispatcher().shutdown().initiate();
        if let Some(mut state) = uninstall() {
            state.teardown();
        }
        info!("shell torn down");
    }
}
