// SPDX-License-Identifier: MPL-2.0
//! Per-notification countdown state machine.
//!
//! ```text
//!            pause               countdown / close          exit timer
//!   Active ────────▶ Paused      Active|Paused ────▶ Exiting ─────────▶ Removed
//!      ▲   ◀──────── │                                  │
//!      │    resume   │                                  │
//!      └──── reset ──┴──────────────────────────────────┘
//! ```
//!
//! Each transition cancels whatever timer it supersedes and schedules the
//! next one, so at most one timer is pending per notification. A fired
//! timer is only honored if it is the one currently pending and matches
//! the current state; anything else is a stale completion and is dropped.

use super::notification::{LifecycleState, NotificationId};
use super::scheduler::{Scheduler, TimerEvent, TimerHandle, TimerKind};
use crate::config::{EXIT_TRANSITION_MS, MAX_REQUESTED_DURATION_MS};
use std::time::{Duration, Instant};

/// Length of the exit transition, shared by every notification.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(EXIT_TRANSITION_MS);

/// What a fired timer did to its notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    /// The event no longer matches this timer and was discarded.
    Stale,
    /// The countdown ran out; the notification is now exiting.
    Expired,
    /// The exit transition completed; the notification must be removed.
    Finished,
}

/// Countdown, pause and exit bookkeeping for one notification.
#[derive(Debug, Clone)]
pub struct NotificationTimer {
    state: LifecycleState,
    duration: Duration,
    /// Time left when the current countdown segment started (or when the
    /// countdown was paused).
    remaining: Duration,
    countdown_started_at: Instant,
    pending: Option<TimerHandle>,
}

impl NotificationTimer {
    /// Starts a full countdown for a new notification.
    pub fn start<S: Scheduler + ?Sized>(
        id: NotificationId,
        duration: Duration,
        now: Instant,
        scheduler: &mut S,
    ) -> Self {
        let mut timer = Self {
            state: LifecycleState::Active,
            duration,
            remaining: duration,
            countdown_started_at: now,
            pending: None,
        };
        timer.start_countdown(id, now, scheduler);
        timer
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the full countdown length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns when the current countdown segment started.
    #[must_use]
    pub fn countdown_started_at(&self) -> Instant {
        self.countdown_started_at
    }

    /// Returns the pending timer, if any.
    #[must_use]
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Returns the countdown time left at `now`.
    ///
    /// Always within `[0, duration]`.
    #[must_use]
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.state {
            LifecycleState::Active => self
                .remaining
                .saturating_sub(now.saturating_duration_since(self.countdown_started_at)),
            LifecycleState::Paused => self.remaining,
            LifecycleState::Exiting | LifecycleState::Removed => Duration::ZERO,
        }
    }

    /// Suspends the countdown, keeping the time left.
    ///
    /// Returns `false` (and does nothing) unless the timer is active.
    pub fn pause<S: Scheduler + ?Sized>(&mut self, now: Instant, scheduler: &mut S) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.remaining = self.remaining_at(now);
        self.cancel_pending(scheduler);
        self.state = LifecycleState::Paused;
        true
    }

    /// Restarts the countdown with the time left at pause.
    ///
    /// Returns `false` (and does nothing) unless the timer is paused.
    pub fn resume<S: Scheduler + ?Sized>(
        &mut self,
        id: NotificationId,
        now: Instant,
        scheduler: &mut S,
    ) -> bool {
        if !self.state.is_paused() {
            return false;
        }
        self.state = LifecycleState::Active;
        self.start_countdown(id, now, scheduler);
        true
    }

    /// Skips the rest of the countdown and starts the exit transition.
    ///
    /// Returns `false` if the timer is already exiting or removed; the
    /// running exit transition is left untouched in that case.
    pub fn close<S: Scheduler + ?Sized>(
        &mut self,
        id: NotificationId,
        now: Instant,
        scheduler: &mut S,
    ) -> bool {
        if !matches!(self.state, LifecycleState::Active | LifecycleState::Paused) {
            return false;
        }
        self.cancel_pending(scheduler);
        self.begin_exit(id, now, scheduler);
        true
    }

    /// Restores a full countdown after an equal notification was requested
    /// again. Works from every live state, including `Exiting`: the pending
    /// exit is cancelled and the notification stays on screen.
    ///
    /// Returns `false` only for a removed timer.
    pub fn reset<S: Scheduler + ?Sized>(
        &mut self,
        id: NotificationId,
        now: Instant,
        scheduler: &mut S,
    ) -> bool {
        if self.state.is_removed() {
            return false;
        }
        self.cancel_pending(scheduler);
        self.state = LifecycleState::Active;
        self.remaining = self.duration;
        self.start_countdown(id, now, scheduler);
        true
    }

    /// Applies a fired timer.
    ///
    /// The transition is computed at the event's deadline, not at the time
    /// the host got around to delivering it.
    pub fn fire<S: Scheduler + ?Sized>(&mut self, event: &TimerEvent, scheduler: &mut S) -> Fired {
        if self.pending != Some(event.handle) {
            return Fired::Stale;
        }
        match (event.kind, self.state) {
            (TimerKind::Countdown, LifecycleState::Active) => {
                self.pending = None;
                self.begin_exit(event.id, event.deadline, scheduler);
                Fired::Expired
            }
            (TimerKind::Exit, LifecycleState::Exiting) => {
                self.pending = None;
                self.state = LifecycleState::Removed;
                Fired::Finished
            }
            _ => Fired::Stale,
        }
    }

    /// Cancels anything pending and marks the timer removed.
    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.cancel_pending(scheduler);
        self.state = LifecycleState::Removed;
    }

    fn start_countdown<S: Scheduler + ?Sized>(
        &mut self,
        id: NotificationId,
        now: Instant,
        scheduler: &mut S,
    ) {
        self.countdown_started_at = now;
        let deadline = deadline_after(now, self.remaining);
        self.pending = Some(scheduler.schedule(deadline, id, TimerKind::Countdown));
    }

    fn begin_exit<S: Scheduler + ?Sized>(
        &mut self,
        id: NotificationId,
        now: Instant,
        scheduler: &mut S,
    ) {
        self.state = LifecycleState::Exiting;
        self.remaining = Duration::ZERO;
        let deadline = deadline_after(now, EXIT_TRANSITION);
        self.pending = Some(scheduler.schedule(deadline, id, TimerKind::Exit));
    }

    fn cancel_pending<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }
}

/// `now + after`, saturating at the longest duration a request may ask for
/// when the platform cannot represent the sum.
fn deadline_after(now: Instant, after: Duration) -> Instant {
    now.checked_add(after)
        .or_else(|| now.checked_add(Duration::from_millis(MAX_REQUESTED_DURATION_MS)))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::scheduler::DeadlineScheduler;

    const ID: u64 = 1;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn setup(duration_ms: u64) -> (NotificationTimer, DeadlineScheduler, Instant) {
        let mut scheduler = DeadlineScheduler::new();
        let start = Instant::now();
        let timer = NotificationTimer::start(
            NotificationId::from_raw(ID),
            ms(duration_ms),
            start,
            &mut scheduler,
        );
        (timer, scheduler, start)
    }

    #[test]
    fn start_schedules_full_countdown() {
        let (timer, scheduler, start) = setup(3000);

        assert_eq!(timer.state(), LifecycleState::Active);
        assert_eq!(timer.remaining_at(start), ms(3000));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(3000)));
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let (mut timer, mut scheduler, start) = setup(3000);

        assert!(timer.pause(start + ms(2000), &mut scheduler));
        assert_eq!(timer.state(), LifecycleState::Paused);
        assert_eq!(timer.remaining_at(start + ms(9000)), ms(1000));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn pause_twice_is_a_noop() {
        let (mut timer, mut scheduler, start) = setup(3000);

        assert!(timer.pause(start + ms(1000), &mut scheduler));
        assert!(!timer.pause(start + ms(2500), &mut scheduler));
        assert_eq!(timer.remaining_at(start + ms(2500)), ms(2000));
    }

    #[test]
    fn resume_while_active_is_a_noop() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        assert!(!timer.resume(id, start + ms(500), &mut scheduler));
        assert_eq!(timer.countdown_started_at(), start);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn resume_restarts_countdown_from_paused_remaining() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        timer.pause(start + ms(2000), &mut scheduler);
        assert!(timer.resume(id, start + ms(7000), &mut scheduler));

        assert_eq!(timer.state(), LifecycleState::Active);
        assert_eq!(timer.countdown_started_at(), start + ms(7000));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(8000)));
    }

    #[test]
    fn pause_after_countdown_elapsed_clamps_to_zero() {
        let (mut timer, mut scheduler, start) = setup(1000);

        timer.pause(start + ms(5000), &mut scheduler);
        assert_eq!(timer.remaining_at(start + ms(5000)), Duration::ZERO);
    }

    #[test]
    fn countdown_then_exit_then_removed() {
        let (mut timer, mut scheduler, start) = setup(3000);

        let countdown = scheduler.pop_due(start + ms(3000)).expect("countdown due");
        assert_eq!(timer.fire(&countdown, &mut scheduler), Fired::Expired);
        assert_eq!(timer.state(), LifecycleState::Exiting);
        assert_eq!(scheduler.next_deadline(), Some(start + ms(3300)));

        let exit = scheduler.pop_due(start + ms(3300)).expect("exit due");
        assert_eq!(timer.fire(&exit, &mut scheduler), Fired::Finished);
        assert_eq!(timer.state(), LifecycleState::Removed);
    }

    #[test]
    fn close_skips_remaining_countdown() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        assert!(timer.close(id, start + ms(100), &mut scheduler));
        assert_eq!(timer.state(), LifecycleState::Exiting);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(start + ms(400)));
    }

    #[test]
    fn close_while_exiting_keeps_original_exit_deadline() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        timer.close(id, start, &mut scheduler);
        assert!(!timer.close(id, start + ms(200), &mut scheduler));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(300)));
    }

    #[test]
    fn close_from_paused_exits() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        timer.pause(start + ms(100), &mut scheduler);
        assert!(timer.close(id, start + ms(200), &mut scheduler));
        assert_eq!(timer.state(), LifecycleState::Exiting);
    }

    #[test]
    fn reset_revives_an_exiting_timer() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        timer.close(id, start + ms(1000), &mut scheduler);
        assert!(timer.reset(id, start + ms(1100), &mut scheduler));

        assert_eq!(timer.state(), LifecycleState::Active);
        assert_eq!(timer.remaining_at(start + ms(1100)), ms(3000));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(start + ms(4100)));
    }

    #[test]
    fn reset_from_paused_restarts_full_countdown() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);

        timer.pause(start + ms(2500), &mut scheduler);
        timer.reset(id, start + ms(4000), &mut scheduler);

        assert_eq!(timer.state(), LifecycleState::Active);
        assert_eq!(scheduler.next_deadline(), Some(start + ms(7000)));
    }

    #[test]
    fn superseded_event_is_stale() {
        let (mut timer, mut scheduler, start) = setup(3000);
        let id = NotificationId::from_raw(ID);
        let original = TimerEvent {
            handle: timer.pending().expect("countdown pending"),
            id,
            kind: TimerKind::Countdown,
            deadline: start + ms(3000),
        };

        timer.reset(id, start + ms(2000), &mut scheduler);

        assert_eq!(timer.fire(&original, &mut scheduler), Fired::Stale);
        assert_eq!(timer.state(), LifecycleState::Active);
    }

    #[test]
    fn cancel_clears_pending_timer() {
        let (mut timer, mut scheduler, _) = setup(3000);

        timer.cancel(&mut scheduler);
        assert_eq!(timer.state(), LifecycleState::Removed);
        assert!(timer.pending().is_none());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn unrepresentable_deadline_saturates() {
        let mut scheduler = DeadlineScheduler::new();
        let start = Instant::now();
        let timer = NotificationTimer::start(
            NotificationId::from_raw(ID),
            Duration::MAX,
            start,
            &mut scheduler,
        );

        assert_eq!(timer.state(), LifecycleState::Active);
        let deadline = scheduler.next_deadline().expect("countdown pending");
        assert!(deadline >= start);
    }
}
