// SPDX-License-Identifier: MPL-2.0
//! Messages an iced application routes to its notification store.

use crate::notifications::{Clock, DeadlineScheduler, NotificationId, NotificationRequest, Store};
use std::time::Instant;

/// Notification messages emitted by views and subscriptions.
#[derive(Debug, Clone)]
pub enum Message {
    /// Show a notification, or re-trigger an equal one.
    Add(NotificationRequest),
    /// Close button pressed.
    Dismiss(NotificationId),
    /// Pointer entered the toast.
    Pause(NotificationId),
    /// Pointer left the toast.
    Resume(NotificationId),
    /// Periodic tick from [`tick_subscription`](super::tick_subscription).
    Tick(Instant),
}

/// Applies a notification message to the store.
pub fn update<C: Clock>(store: &mut Store<C, DeadlineScheduler>, message: Message) {
    match message {
        Message::Add(request) => {
            store.add(request);
        }
        Message::Dismiss(id) => {
            store.dismiss(id);
        }
        Message::Pause(id) => {
            store.pause(id);
        }
        Message::Resume(id) => {
            store.resume(id);
        }
        Message::Tick(now) => {
            store.tick(now);
        }
    }
}
