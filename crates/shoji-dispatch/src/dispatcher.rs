use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use shoji_common::DispatchError;
use tracing::trace;

use crate::completion::{self, Outcome};
use crate::scheduler::Scheduler;
use crate::shutdown::ShutdownGuard;

/// Marshals work onto the UI thread and waits for it.
///
/// Cheap to clone; every clone shares the scheduler and shutdown state.
#[derive(Clone)]
pub struct Dispatcher {
    ui_thread: ThreadId,
    scheduler: Arc<dyn Scheduler>,
    shutdown: Arc<ShutdownGuard>,
}

impl Dispatcher {
    pub fn new(ui_thread: ThreadId, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            ui_thread,
            scheduler,
            shutdown: Arc::new(ShutdownGuard::new()),
        }
    }

    /// Dispatcher whose UI thread is the calling thread.
    pub fn for_current_thread(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::new(thread::current().id(), scheduler)
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    pub fn shutdown(&self) -> &ShutdownGuard {
        &self.shutdown
    }

    /// Run `work` on the UI thread and return its result.
    ///
    /// On the UI thread this calls `work` in the current stack frame, so
    /// nested calls from inside dispatched work never re-enter the queue.
    /// Elsewhere it enqueues `work` and blocks until the UI thread has run
    /// it. There is no timeout: a stalled UI thread stalls the caller.
    ///
    /// # Panics
    ///
    /// Re-raises, on the calling thread, any panic raised by `work`.
    pub fn run_on_ui_thread<R, F>(&self, work: F) -> Result<R, DispatchError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let _op = self.shutdown.begin()?;

        if self.is_ui_thread() {
            return Ok(work());
        }

        let (completer, waiter) = completion::pair();
        self.scheduler.schedule(Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(work));
            completer.complete(result);
        }))?;
        trace!("dispatched job to ui thread");

        match waiter.wait() {
            Outcome::Done(Ok(value)) => Ok(value),
            Outcome::Done(Err(payload)) => panic::resume_unwind(payload),
            Outcome::Abandoned => Err(DispatchError::Abandoned),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("ui_thread", &self.ui_thread)
            .field("shutting_down", &self.shutdown.is_shutting_down())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
