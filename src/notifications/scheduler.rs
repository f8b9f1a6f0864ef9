// SPDX-License-Identifier: MPL-2.0
//! Delay scheduling for notification timers.
//!
//! A [`Scheduler`] accepts a deadline and hands back a cancelable
//! [`TimerHandle`]. When the deadline passes, the scheduler produces a
//! [`TimerEvent`] which the owner of the store feeds into
//! [`Store::handle_timer`](super::Store::handle_timer). Timers never call
//! back into the store themselves, so every transition happens on the
//! store owner's turn.
//!
//! Deadlines are absolute instants rather than relative delays: the exit
//! transition is chained off the countdown's own deadline, which keeps
//! `duration + exit` exact even when the host notices the countdown late.

use super::notification::NotificationId;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Identifies one scheduled timer. Handles are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a raw handle value.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Which phase of a notification's life a timer ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The visible countdown; firing moves the notification to `Exiting`.
    Countdown,
    /// The exit transition; firing removes the notification.
    Exit,
}

/// A timer that reached its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub handle: TimerHandle,
    pub id: NotificationId,
    pub kind: TimerKind,
    pub deadline: Instant,
}

/// Schedules and cancels notification timers.
pub trait Scheduler {
    /// Arranges for a [`TimerEvent`] to be delivered once `at` has passed.
    fn schedule(&mut self, at: Instant, id: NotificationId, kind: TimerKind) -> TimerHandle;

    /// Cancels a pending timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Polled scheduler for hosts that already run a periodic tick.
///
/// Pending timers are kept ordered by deadline; [`pop_due`](Self::pop_due)
/// yields them one at a time so that transitions scheduled while handling
/// an event (countdown → exit) are themselves eligible in the same pass.
#[derive(Debug, Default)]
pub struct DeadlineScheduler {
    /// Pending timers ordered by (deadline, handle).
    pending: BTreeMap<(Instant, TimerHandle), TimerEvent>,
    /// Deadline lookup for cancellation.
    deadlines: HashMap<TimerHandle, Instant>,
    next_handle: u64,
}

impl DeadlineScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the earliest timer whose deadline is at or
    /// before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerEvent> {
        let (&key, _) = self.pending.first_key_value()?;
        if key.0 > now {
            return None;
        }
        let event = self.pending.remove(&key)?;
        self.deadlines.remove(&event.handle);
        Some(event)
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first_key_value().map(|((at, _), _)| *at)
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for DeadlineScheduler {
    fn schedule(&mut self, at: Instant, id: NotificationId, kind: TimerKind) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.pending.insert(
            (at, handle),
            TimerEvent {
                handle,
                id,
                kind,
                deadline: at,
            },
        );
        self.deadlines.insert(handle, at);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(at) = self.deadlines.remove(&handle) {
            self.pending.remove(&(at, handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn id(raw: u64) -> NotificationId {
        NotificationId::from_raw(raw)
    }

    #[test]
    fn nothing_is_due_before_its_deadline() {
        let mut scheduler = DeadlineScheduler::new();
        let start = Instant::now();
        scheduler.schedule(start + Duration::from_millis(100), id(1), TimerKind::Countdown);

        assert!(scheduler
            .pop_due(start + Duration::from_millis(99))
            .is_none());
        let fired = scheduler
            .pop_due(start + Duration::from_millis(100))
            .expect("timer should be due at its deadline");
        assert_eq!(fired.id, id(1));
        assert_eq!(fired.kind, TimerKind::Countdown);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn due_timers_come_out_in_deadline_order() {
        let mut scheduler = DeadlineScheduler::new();
        let start = Instant::now();
        scheduler.schedule(start + Duration::from_millis(300), id(1), TimerKind::Exit);
        scheduler.schedule(start + Duration::from_millis(100), id(2), TimerKind::Countdown);
        scheduler.schedule(start + Duration::from_millis(200), id(3), TimerKind::Countdown);

        let now = start + Duration::from_secs(1);
        let order: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(now))
            .map(|event| event.id)
            .collect();
        assert_eq!(order, vec![id(2), id(3), id(1)]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = DeadlineScheduler::new();
        let start = Instant::now();
        let handle =
            scheduler.schedule(start + Duration::from_millis(10), id(1), TimerKind::Countdown);

        scheduler.cancel(handle);

        assert!(scheduler.pop_due(start + Duration::from_secs(1)).is_none());
        assert_eq!(scheduler.len(), 0);
    }

    #[test]
    fn cancelling_twice_is_harmless() {
        let mut scheduler = DeadlineScheduler::new();
        let start = Instant::now();
        let handle = scheduler.schedule(start, id(1), TimerKind::Exit);

        scheduler.cancel(handle);
        scheduler.cancel(handle);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let mut scheduler = DeadlineScheduler::new();
        let at = Instant::now();
        let first = scheduler.schedule(at, id(1), TimerKind::Countdown);
        let second = scheduler.schedule(at, id(1), TimerKind::Countdown);

        assert_ne!(first, second);
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.next_deadline(), Some(at));
    }
}
