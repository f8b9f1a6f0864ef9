// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Notifications**: Display duration, exit transition and tick interval
//! - **Diagnostics**: Lifecycle event buffer sizing

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default visible time for a notification when the caller does not
/// request one (or requests a non-positive one), in milliseconds.
pub const DEFAULT_DISPLAY_DURATION_MS: u64 = 3000;

/// Minimum configurable default display duration (in milliseconds).
pub const MIN_DISPLAY_DURATION_MS: u64 = 500;

/// Maximum configurable default display duration (in milliseconds).
pub const MAX_DISPLAY_DURATION_MS: u64 = 60_000;

/// Longest display duration a single request may ask for (one year).
///
/// Longer requests are capped to this value.
pub const MAX_REQUESTED_DURATION_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Length of the exit transition between `Exiting` and removal.
///
/// Fixed for every notification; the display duration only governs
/// the countdown.
pub const EXIT_TRANSITION_MS: u64 = 300;

/// Default polling interval for hosts that drive timers from a periodic tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Minimum tick interval (roughly one frame at 60 Hz).
pub const MIN_TICK_INTERVAL_MS: u64 = 16;

/// Maximum tick interval.
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of lifecycle events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1000;

/// Minimum diagnostics buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum diagnostics buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Display duration validation
    assert!(MIN_DISPLAY_DURATION_MS > 0);
    assert!(MAX_DISPLAY_DURATION_MS >= MIN_DISPLAY_DURATION_MS);
    assert!(DEFAULT_DISPLAY_DURATION_MS >= MIN_DISPLAY_DURATION_MS);
    assert!(DEFAULT_DISPLAY_DURATION_MS <= MAX_DISPLAY_DURATION_MS);

    // The exit transition must be shorter than any countdown
    assert!(EXIT_TRANSITION_MS > 0);
    assert!(EXIT_TRANSITION_MS < MIN_DISPLAY_DURATION_MS);

    // Tick interval validation
    assert!(MIN_TICK_INTERVAL_MS > 0);
    assert!(MAX_TICK_INTERVAL_MS >= MIN_TICK_INTERVAL_MS);
    assert!(DEFAULT_TICK_INTERVAL_MS >= MIN_TICK_INTERVAL_MS);
    assert!(DEFAULT_TICK_INTERVAL_MS <= MAX_TICK_INTERVAL_MS);

    // Diagnostics buffer validation
    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
};
