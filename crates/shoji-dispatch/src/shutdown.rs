//! Shutdown state shared by every dispatcher clone.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use shoji_common::DispatchError;

/// Rejects new operations once shutdown starts and counts the ones in
/// flight so teardown can wait for them.
#[derive(Debug, Default)]
pub struct ShutdownGuard {
    shutting_down: AtomicBool,
    active: AtomicUsize,
}

/// Marks one in-flight operation; released on drop.
#[must_use]
pub struct OperationToken<'a> {
    guard: &'a ShutdownGuard,
}

impl ShutdownGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initiate(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Register an operation, or fail if shutdown has begun.
    pub fn begin(&self) -> Result<OperationToken<'_>, DispatchError> {
        if self.is_shutting_down() {
            return Err(DispatchError::ShuttingDown);
        }
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(OperationToken { guard: self })
    }

    pub fn active_operations(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Poll until no operation is in flight. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.active_operations() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        true
    }
}

impl Drop for OperationToken<'_> {
    fn drop(&mut self) {
        self.guard.active.fetch_sub(1, Ordering::SeqCst);
    }
}
