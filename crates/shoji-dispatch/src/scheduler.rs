//! Queues that carry jobs onto the UI thread.

use std::sync::mpsc;
use std::time::Duration;

use shoji_common::DispatchError;

/// A unit of work bound for the UI thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Enqueues jobs on the UI thread's event queue.
///
/// Implementations must preserve arrival order. The app implements this on
/// top of the winit event-loop proxy; [`JobQueue`] is the in-process
/// variant used headless and in tests.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, job: Job) -> Result<(), DispatchError>;
}

/// Sending half of an in-process job queue.
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
}

/// Receiving half; owned by the thread acting as the UI thread.
pub struct JobPump {
    rx: mpsc::Receiver<Job>,
}

pub fn job_queue() -> (JobQueue, JobPump) {
    let (tx, rx) = mpsc::channel();
    (JobQueue { tx }, JobPump { rx })
}

impl Scheduler for JobQueue {
    fn schedule(&self, job: Job) -> Result<(), DispatchError> {
        self.tx.send(job).map_err(|_| DispatchError::SchedulerClosed)
    }
}

impl JobPump {
    /// Wait up to `timeout` for one job and run it.
    pub fn run_one(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }

    /// Serve jobs until every [`JobQueue`] has been dropped.
    pub fn run_until_closed(&self) {
        while let Ok(job) = self.rx.recv() {
            job();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn jobs_run_in_arrival_order() {
        let (queue, pump) = job_queue();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let log = Arc::clone(&log);
            queue
                .schedule(Box::new(move || log.lock().unwrap().push(i)))
                .unwrap();
        }
        drop(queue);
        pump.run_until_closed();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn schedule_after_pump_dropped_fails() {
        let (queue, pump) = job_queue();
        drop(pump);
        let err = queue.schedule(Box::new(|| {})).unwrap_err();
        assert_eq!(err, DispatchError::SchedulerClosed);
    }

    #[test]
    fn run_one_times_out_when_empty() {
        let (_queue, pump) = job_queue();
        assert!(!pump.run_one(Duration::from_millis(5)));
    }
}
