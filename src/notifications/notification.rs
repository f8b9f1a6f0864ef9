// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` entry held by the store, the
//! `NotificationRequest` callers submit, and the `Severity` used both for
//! styling and as half of the deduplication key.

use super::timer::NotificationTimer;
use crate::config::MAX_REQUESTED_DURATION_MS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Wraps a raw identifier.
    ///
    /// Stores allocate ids through their own [`IdGenerator`]; this is meant
    /// for hosts that round-trip ids through messages.
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocates notification ids for one store.
///
/// The counter lives as long as its store and is never reset, so an id is
/// never handed out twice by the same store.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Creates a generator whose first id is `#1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn next_id(&mut self) -> NotificationId {
        self.last += 1;
        NotificationId(self.last)
    }
}

/// Severity level determines visual styling in the presentation layer.
///
/// The core only compares severities: two requests with the same message
/// and severity are the same notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Operation completed successfully.
    #[default]
    Success,
    /// Informational message.
    Info,
    /// Warning that doesn't block operation.
    Warning,
    /// Error requiring attention.
    Error,
}

impl Severity {
    /// Returns the lowercase name used in configuration and scenario files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a notification is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Counting down towards its exit.
    #[default]
    Active,
    /// Countdown suspended (e.g. pointer hovering the toast).
    Paused,
    /// Playing the exit transition; removed once it completes.
    Exiting,
    /// Gone from the store. Terminal.
    Removed,
}

impl LifecycleState {
    /// Returns true while the countdown is running.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns true while the countdown is suspended.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true during the exit transition.
    #[must_use]
    pub fn is_exiting(self) -> bool {
        matches!(self, Self::Exiting)
    }

    /// Returns true once the notification has been removed.
    #[must_use]
    pub fn is_removed(self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Returns the lowercase state name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Exiting => "exiting",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to show a notification.
///
/// # Example
///
/// ```
/// use iced_toasts::notifications::{NotificationRequest, Severity};
/// use std::time::Duration;
///
/// let request = NotificationRequest::warning("Disk almost full")
///     .with_duration(Duration::from_secs(5));
/// assert_eq!(request.severity(), Severity::Warning);
/// assert_eq!(request.duration(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    message: String,
    severity: Severity,
    duration: Option<Duration>,
}

impl NotificationRequest {
    /// Creates a request with the given severity and message, using the
    /// store's default display duration.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            duration: None,
        }
    }

    /// Creates a success request.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Creates an info request.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Creates a warning request.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates an error request.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Requests a specific display duration. A zero duration means
    /// "use the default"; anything above one year is capped.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = (!duration.is_zero()).then(|| duration.min(max_requested_duration()));
        self
    }

    /// Requests a display duration in milliseconds. Non-positive values
    /// mean "use the default"; anything above one year is capped.
    #[must_use]
    pub fn with_duration_ms(mut self, millis: i64) -> Self {
        self.duration = u64::try_from(millis)
            .ok()
            .filter(|ms| *ms > 0)
            .map(|ms| Duration::from_millis(ms.min(MAX_REQUESTED_DURATION_MS)));
        self
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the requested duration, if any.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns true if a notification with this content would be
    /// deduplicated against `notification`.
    #[must_use]
    pub fn matches(&self, notification: &Notification) -> bool {
        notification.severity == self.severity && notification.message == self.message
    }

    pub(crate) fn into_parts(self) -> (String, Severity, Option<Duration>) {
        (self.message, self.severity, self.duration)
    }
}

/// A notification currently held by the store.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    message: String,
    severity: Severity,
    /// Bumped each time an equal request re-triggers this notification.
    generation: u64,
    created_at: Instant,
    pub(crate) timer: NotificationTimer,
}

impl Notification {
    pub(crate) fn new(
        id: NotificationId,
        message: String,
        severity: Severity,
        created_at: Instant,
        timer: NotificationTimer,
    ) -> Self {
        Self {
            id,
            message,
            severity,
            generation: 0,
            created_at,
            timer,
        }
    }

    /// Returns the notification's unique ID.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity level.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns how many times this notification was re-triggered.
    ///
    /// Presentation layers key their transition state (e.g. an exit
    /// animation flag) on this value.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.timer.state()
    }

    /// Returns true during the exit transition.
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.state().is_exiting()
    }

    /// Returns the full countdown length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.timer.duration()
    }

    /// Returns the countdown time left at `now`.
    #[must_use]
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.timer.remaining_at(now)
    }

    /// Returns when the current countdown segment started.
    #[must_use]
    pub fn countdown_started_at(&self) -> Instant {
        self.timer.countdown_started_at()
    }

    /// Returns when this notification was first created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// Owned, serializable view of a notification for renderers and
/// observers outside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastSnapshot {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub state: LifecycleState,
    pub generation: u64,
}

impl From<&Notification> for ToastSnapshot {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id(),
            message: notification.message().to_string(),
            severity: notification.severity(),
            state: notification.state(),
            generation: notification.generation(),
        }
    }
}

fn max_requested_duration() -> Duration {
    Duration::from_millis(MAX_REQUESTED_DURATION_MS)
}
