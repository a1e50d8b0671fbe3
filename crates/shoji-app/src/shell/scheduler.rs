use std::sync::Mutex;

use shoji_common::DispatchError;
use shoji_dispatch::{Job, Scheduler};
use winit::event_loop::EventLoopProxy;

use super::ShellEvent;

/// Schedules dispatcher jobs as user events on the winit loop.
pub struct ProxyScheduler {
    proxy: Mutex<EventLoopProxy<ShellEvent>>,
}

impl ProxyScheduler {
    pub fn new(proxy: EventLoopProxy<ShellEvent>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }
}

impl Scheduler for ProxyScheduler {
    fn schedule(&self, job: Job) -> Result<(), DispatchError> {
        let proxy = self
            .proxy
            .lock()
            .map_err(|_| DispatchError::SchedulerClosed)?;
        proxy
            .send_event(ShellEvent::Dispatch(job))
            .map_err(|_| DispatchError::SchedulerClosed)
    }
}
