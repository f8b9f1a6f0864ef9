// SPDX-License-Identifier: MPL-2.0
//! Tokio-backed timers.
//!
//! Each scheduled timer is a spawned task sleeping until its deadline, then
//! sending its [`TimerEvent`] on an unbounded channel. Cancelling aborts the
//! task, so a cancelled timer never reaches the channel unless it already
//! fired; the store discards those late events by handle.

use crate::notifications::{Clock, NotificationId, Scheduler, TimerEvent, TimerHandle, TimerKind};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Clock reading Tokio's time source.
///
/// Follows paused or advanced time in tests, unlike
/// [`SystemClock`](crate::notifications::SystemClock).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Scheduler spawning one Tokio task per timer.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    fired_tx: mpsc::UnboundedSender<TimerEvent>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_handle: u64,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiver its timers fire into.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (
            Self {
                fired_tx,
                tasks: HashMap::new(),
                next_handle: 0,
            },
            fired_rx,
        )
    }

    /// Returns the number of timers that have not fired or been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, at: Instant, id: NotificationId, kind: TimerKind) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_handle += 1;
        let handle = TimerHandle::new(self.next_handle);
        let event = TimerEvent {
            handle,
            id,
            kind,
            deadline: at,
        };
        let fired_tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await;
            // Receiver gone means the service shut down
            let _ = fired_tx.send(event);
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
