//! Synchronous cross-thread dispatch onto the UI thread.
//!
//! Every mutation of native UI state (windows, views, menus, trays) goes
//! through [`Dispatcher::run_on_ui_thread`]. Calls from the UI thread run in
//! place; calls from any other thread are queued in FIFO order and block
//! until the UI thread has run them. A panic inside the work is re-raised
//! on the caller's thread.

mod completion;
mod dispatcher;
mod scheduler;
mod shutdown;

pub use dispatcher::Dispatcher;
pub use scheduler::{job_queue, Job, JobPump, JobQueue, Scheduler};
pub use shutdown::{OperationToken, ShutdownGuard};
