// SPDX-License-Identifier: MPL-2.0
//! Notification collection and lifecycle management.
//!
//! The `Store` owns the ordered list of live notifications, hands out ids,
//! deduplicates equal requests and routes timer completions back into each
//! notification's [`NotificationTimer`]. Every operation takes `&mut self`
//! and finishes before returning, so readers never see a half-applied
//! change.

use super::clock::{Clock, SystemClock};
use super::notification::{
    IdGenerator, Notification, NotificationId, NotificationRequest, Severity, ToastSnapshot,
};
use super::scheduler::{DeadlineScheduler, Scheduler, TimerEvent};
use super::timer::{Fired, NotificationTimer};
use crate::diagnostics::{
    DiagnosticEventKind, DiagnosticsHandle, ExitReason, LifecycleEvent, LifecycleTransition,
};
use crate::domain::notification::DisplayDuration;
use std::time::{Duration, Instant};

/// Manages the live notifications.
#[derive(Debug)]
pub struct Store<C = SystemClock, S = DeadlineScheduler> {
    /// Live notifications in insertion (display) order.
    notifications: Vec<Notification>,
    ids: IdGenerator,
    clock: C,
    scheduler: S,
    /// Applied to requests without a positive duration of their own.
    default_duration: Duration,
    /// Optional diagnostics handle for logging lifecycle transitions.
    diagnostics: Option<DiagnosticsHandle>,
}

impl Store {
    /// Creates an empty store on wall-clock time, driven by [`Store::tick`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(SystemClock, DeadlineScheduler::new())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, S: Scheduler> Store<C, S> {
    /// Creates an empty store from a clock and a scheduler.
    pub fn with_parts(clock: C, scheduler: S) -> Self {
        Self {
            notifications: Vec::new(),
            ids: IdGenerator::new(),
            clock,
            scheduler,
            default_duration: DisplayDuration::default().as_duration(),
            diagnostics: None,
        }
    }

    /// Sets the duration used when a request does not carry one.
    #[must_use]
    pub fn with_default_duration(mut self, duration: DisplayDuration) -> Self {
        self.default_duration = duration.as_duration();
        self
    }

    /// Sets the diagnostics handle for logging lifecycle transitions.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Returns the duration applied to requests without one.
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Shows a notification.
    ///
    /// If a notification with the same message and severity is already
    /// live, that notification is re-triggered instead: its generation is
    /// bumped and its countdown restarts at full length, even if it was
    /// paused or already exiting. Otherwise a new notification is appended.
    ///
    /// Returns the id of the notification that was created or re-triggered.
    pub fn add(&mut self, request: NotificationRequest) -> NotificationId {
        let now = self.clock.now();

        if let Some(index) = self.notifications.iter().position(|n| request.matches(n)) {
            let notification = &mut self.notifications[index];
            let id = notification.id();
            let revived = notification.is_exiting();
            notification.timer.reset(id, now, &mut self.scheduler);
            let generation = notification.bump_generation();
            self.log(id, LifecycleTransition::Reset { generation, revived }, now);
            return id;
        }

        let (message, severity, duration) = request.into_parts();
        let duration = duration.unwrap_or(self.default_duration);
        let id = self.ids.next_id();
        let timer = NotificationTimer::start(id, duration, now, &mut self.scheduler);

        self.log(
            id,
            LifecycleTransition::Created {
                severity,
                duration_ms: millis(duration),
            },
            now,
        );
        if let Some(handle) = &self.diagnostics {
            match severity {
                Severity::Warning => handle.log(
                    DiagnosticEventKind::Warning {
                        notification_id: id,
                        message: message.clone(),
                    },
                    now,
                ),
                Severity::Error => handle.log(
                    DiagnosticEventKind::Error {
                        notification_id: id,
                        message: message.clone(),
                    },
                    now,
                ),
                Severity::Success | Severity::Info => {}
            }
        }

        self.notifications
            .push(Notification::new(id, message, severity, now, timer));
        id
    }

    /// Removes a notification immediately, cancelling its timers.
    ///
    /// Returns `true` if the notification was found and removed.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut notification = self.notifications.remove(index);
        notification.timer.cancel(&mut self.scheduler);
        let now = self.clock.now();
        self.log(id, LifecycleTransition::Removed, now);
        true
    }

    /// Suspends a notification's countdown (e.g. on pointer enter).
    ///
    /// Returns `true` if the notification was active and is now paused.
    pub fn pause(&mut self, id: NotificationId) -> bool {
        let now = self.clock.now();
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let timer = &mut self.notifications[index].timer;
        if !timer.pause(now, &mut self.scheduler) {
            return false;
        }
        let remaining_ms = millis(timer.remaining_at(now));
        self.log(id, LifecycleTransition::Paused { remaining_ms }, now);
        true
    }

    /// Restarts a paused countdown with the time it had left (e.g. on
    /// pointer leave).
    ///
    /// Returns `true` if the notification was paused and is now active.
    pub fn resume(&mut self, id: NotificationId) -> bool {
        let now = self.clock.now();
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let timer = &mut self.notifications[index].timer;
        if !timer.resume(id, now, &mut self.scheduler) {
            return false;
        }
        let remaining_ms = millis(timer.remaining_at(now));
        self.log(id, LifecycleTransition::Resumed { remaining_ms }, now);
        true
    }

    /// Starts the exit transition right away, whatever time is left.
    ///
    /// Returns `true` if the notification was active or paused.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let now = self.clock.now();
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.notifications[index]
            .timer
            .close(id, now, &mut self.scheduler)
        {
            return false;
        }
        self.log(
            id,
            LifecycleTransition::Exiting {
                reason: ExitReason::Dismissed,
            },
            now,
        );
        true
    }

    /// Applies a timer that reached its deadline.
    ///
    /// Events for removed notifications, and events superseded by a later
    /// transition, are discarded.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        let Some(index) = self.index_of(event.id) else {
            return;
        };
        let fired = self.notifications[index]
            .timer
            .fire(&event, &mut self.scheduler);
        match fired {
            Fired::Stale => {}
            Fired::Expired => self.log(
                event.id,
                LifecycleTransition::Exiting {
                    reason: ExitReason::Expired,
                },
                event.deadline,
            ),
            Fired::Finished => {
                self.notifications.remove(index);
                self.log(event.id, LifecycleTransition::Removed, event.deadline);
            }
        }
    }

    /// Removes every notification and cancels all pending timers.
    pub fn clear(&mut self) {
        let now = self.clock.now();
        for mut notification in std::mem::take(&mut self.notifications) {
            notification.timer.cancel(&mut self.scheduler);
            self.log(notification.id(), LifecycleTransition::Removed, now);
        }
    }

    /// Returns the notification with the given id.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id() == id)
    }

    /// Returns the live notification with this message and severity.
    #[must_use]
    pub fn find(&self, message: &str, severity: Severity) -> Option<&Notification> {
        self.notifications
            .iter()
            .find(|n| n.severity() == severity && n.message() == message)
    }

    /// Returns the live notifications in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Returns the live notifications as a slice, in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[Notification] {
        &self.notifications
    }

    /// Returns owned views of the live notifications, in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ToastSnapshot> {
        self.notifications.iter().map(ToastSnapshot::from).collect()
    }

    /// Returns the number of live notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Returns true if there are no live notifications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Returns whether there are any notifications to show.
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the current time according to the store's clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Returns the store's clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the store's scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn index_of(&self, id: NotificationId) -> Option<usize> {
        self.notifications.iter().position(|n| n.id() == id)
    }

    fn log(&self, id: NotificationId, transition: LifecycleTransition, at: Instant) {
        if let Some(handle) = &self.diagnostics {
            handle.log_lifecycle(LifecycleEvent::new(id, transition), at);
        }
    }
}

impl<C: Clock> Store<C, DeadlineScheduler> {
    /// Fires every timer due at `now`, in deadline order.
    ///
    /// Each transition is applied at its own deadline, so a single late
    /// tick still produces exact countdown and exit timings.
    ///
    /// Returns the number of timer events processed.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut processed = 0;
        while self.fire_due(now) {
            processed += 1;
        }
        processed
    }

    /// Applies the earliest timer due at `now`, if any.
    ///
    /// Lets a host observe the store between individual transitions.
    /// Returns false once nothing is due.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.scheduler.pop_due(now) {
            Some(event) => {
                self.handle_timer(event);
                true
            }
            None => false,
        }
    }

    /// Returns the earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
