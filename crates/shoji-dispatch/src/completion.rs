//! One-shot completion signal: a mutex-guarded slot plus a condvar.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;

enum Slot<R> {
    Pending,
    Ready(thread::Result<R>),
    Abandoned,
}

struct Shared<R> {
    slot: Mutex<Slot<R>>,
    ready: Condvar,
}

/// Outcome observed by the waiting caller.
pub(crate) enum Outcome<R> {
    Done(thread::Result<R>),
    Abandoned,
}

/// Completing half, moved into the job that runs on the UI thread.
///
/// Dropping it without completing wakes the waiter with
/// [`Outcome::Abandoned`], so a job discarded by a dying event loop never
/// leaves its caller blocked.
pub(crate) struct Completer<R> {
    shared: Arc<Shared<R>>,
    done: bool,
}

pub(crate) struct Waiter<R> {
    shared: Arc<Shared<R>>,
}

pub(crate) fn pair<R>() -> (Completer<R>, Waiter<R>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot::Pending),
        ready: Condvar::new(),
    });
    (
        Completer {
            shared: Arc::clone(&shared),
            done: false,
        },
        Waiter { shared },
    )
}

impl<R> Completer<R> {
    pub(crate) fn complete(mut self, result: thread::Result<R>) {
        self.fill(Slot::Ready(result));
        self.done = true;
    }

    fn fill(&self, value: Slot<R>) {
        let mut slot = self
            .shared
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = value;
        self.shared.ready.notify_all();
    }
}

impl<R> Drop for Completer<R> {
    fn drop(&mut self) {
        if !self.done {
            self.fill(Slot::Abandoned);
        }
    }
}

impl<R> Waiter<R> {
    /// Block until the completer fires or is dropped.
    pub(crate) fn wait(self) -> Outcome<R> {
        let mut slot = self
            .shared
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            match std::mem::replace(&mut *slot, Slot::Pending) {
                Slot::Pending => {
                    slot = self
                        .shared
                        .ready
                        .wait(slot)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Slot::Ready(result) => return Outcome::Done(result),
                Slot::Abandoned => return Outcome::Abandoned,
            }
        }
    }
}
