// SPDX-License-Identifier: MPL-2.0
//! Monotonic time sources for notification timers.
//!
//! The store never calls `Instant::now()` directly. It asks a [`Clock`],
//! so the same state machine runs against wall time in an application and
//! against a hand-advanced [`ManualClock`] in tests and scenario replays.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic clock.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same timeline, so a test can keep one handle while
/// the store owns another.
///
/// # Example
///
/// ```
/// use iced_toasts::notifications::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - start, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    /// Microseconds elapsed since `origin`.
    offset_us: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock frozen at `origin`.
    #[must_use]
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            offset_us: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the instant this clock started at.
    #[must_use]
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Returns how far the clock has moved since its origin.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.offset_us.load(Ordering::SeqCst))
    }

    /// Moves the clock forward, saturating at the furthest representable
    /// offset.
    pub fn advance(&self, by: Duration) {
        let by = micros(by);
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .offset_us
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |offset| {
                Some(offset.saturating_add(by))
            });
    }

    /// Moves the clock to `instant`. Instants before the current time are
    /// ignored so the clock stays monotonic.
    pub fn set(&self, instant: Instant) {
        let target = micros(instant.saturating_duration_since(self.origin));
        self.offset_us.fetch_max(target, Ordering::SeqCst);
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_frozen() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn clones_share_the_same_timeline() {
        let clock = ManualClock::new();
        let other = clock.clone();

        other.advance(Duration::from_millis(40));

        assert_eq!(clock.elapsed(), Duration::from_millis(40));
        assert_eq!(clock.now(), other.now());
    }

    #[test]
    fn set_never_moves_backwards() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(2));

        clock.set(clock.origin() + Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));

        clock.set(clock.origin() + Duration::from_secs(5));
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn advance_saturates_instead_of_wrapping() {
        let clock = ManualClock::new();
        clock.advance(Duration::MAX);
        clock.advance(Duration::from_secs(1));

        assert_eq!(clock.elapsed(), Duration::from_micros(u64::MAX));
    }
}
