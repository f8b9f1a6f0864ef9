// SPDX-License-Identifier: MPL-2.0
//! Notification timing newtypes.
//!
//! This module provides type-safe wrappers for the configurable timing
//! values of the notification system, ensuring they are always within
//! valid ranges.

use std::time::Duration;

// =============================================================================
// Display Duration Bounds
// =============================================================================

/// Default display duration bounds (500 ms to 60 s).
pub mod display_duration_bounds {
    /// Minimum default display duration in milliseconds.
    pub const MIN_MS: u64 = 500;
    /// Maximum default display duration in milliseconds.
    pub const MAX_MS: u64 = 60_000;
    /// Default display duration in milliseconds.
    pub const DEFAULT_MS: u64 = 3000;
}

// =============================================================================
// DisplayDuration
// =============================================================================

/// Fallback display duration applied to notifications that do not request
/// a positive duration of their own.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (500 ms–60 s).
///
/// # Example
///
/// ```
/// use iced_toasts::domain::notification::DisplayDuration;
///
/// let duration = DisplayDuration::new(5000);
/// assert_eq!(duration.value(), 5000);
///
/// // Values outside range are clamped
/// let too_short = DisplayDuration::new(10);
/// assert_eq!(too_short.value(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayDuration(u64);

impl DisplayDuration {
    /// Creates a new display duration in milliseconds, clamping to valid range.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(
            display_duration_bounds::MIN_MS,
            display_duration_bounds::MAX_MS,
        ))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the value as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for DisplayDuration {
    fn default() -> Self {
        Self(display_duration_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Tick Interval Bounds
// =============================================================================

/// Tick interval bounds (16 ms to 1 s).
pub mod tick_interval_bounds {
    /// Minimum tick interval in milliseconds.
    pub const MIN_MS: u64 = 16;
    /// Maximum tick interval in milliseconds.
    pub const MAX_MS: u64 = 1000;
    /// Default tick interval in milliseconds.
    pub const DEFAULT_MS: u64 = 100;
}

// =============================================================================
// TickInterval
// =============================================================================

/// Polling period for hosts that drive notification timers from a
/// periodic tick rather than from real timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval(u64);

impl TickInterval {
    /// Creates a new tick interval in milliseconds, clamping to valid range.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(tick_interval_bounds::MIN_MS, tick_interval_bounds::MAX_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the interval as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Self(tick_interval_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Tests
// =============================================================================
