// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for notification activity.
//!
//! Every lifecycle transition of a notification is recorded as a
//! [`LifecycleEvent`]. Warning and error notifications are additionally
//! recorded as [`DiagnosticEventKind::Warning`] / [`DiagnosticEventKind::Error`]
//! so that a report shows what the user was told went wrong.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::notifications::{NotificationId, Severity};

/// Why a notification started its exit transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The countdown ran out.
    Expired,
    /// The user dismissed it.
    Dismissed,
}

/// A single lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum LifecycleTransition {
    /// A new notification entered the store.
    Created {
        severity: Severity,
        duration_ms: u64,
    },

    /// An equal request re-triggered an existing notification.
    Reset {
        /// Generation after the bump.
        generation: u64,
        /// Whether the reset cancelled a running exit transition.
        revived: bool,
    },

    /// The countdown was suspended.
    Paused { remaining_ms: u64 },

    /// The countdown was restarted.
    Resumed { remaining_ms: u64 },

    /// The exit transition started.
    Exiting { reason: ExitReason },

    /// The notification left the store.
    Removed,
}

/// A lifecycle transition of one notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub notification_id: NotificationId,
    #[serde(flatten)]
    pub transition: LifecycleTransition,
}

impl LifecycleEvent {
    #[must_use]
    pub fn new(notification_id: NotificationId, transition: LifecycleTransition) -> Self {
        Self {
            notification_id,
            transition,
        }
    }
}

/// A diagnostic event with timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    /// The type and data of the event
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self::with_timestamp(kind, Instant::now())
    }

    /// Creates a new diagnostic event with a specific timestamp.
    ///
    /// The store stamps events with its own clock, which may be virtual.
    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// A notification changed state.
    Lifecycle {
        #[serde(flatten)]
        event: LifecycleEvent,
    },

    /// A warning notification was shown.
    Warning {
        notification_id: NotificationId,
        message: String,
    },

    /// An error notification was shown.
    Error {
        notification_id: NotificationId,
        message: String,
    },
}

impl DiagnosticEventKind {
    /// Returns the notification this event is about.
    #[must_use]
    pub fn notification_id(&self) -> NotificationId {
        match self {
            Self::Lifecycle { event } => event.notification_id,
            Self::Warning {
                notification_id, ..
            }
            | Self::Error {
                notification_id, ..
            } => *notification_id,
        }
    }
}
