// SPDX-License-Identifier: MPL-2.0
//! Periodic tick subscription for notification timers.

use super::Message;
use crate::domain::notification::TickInterval;
use iced::{time, Subscription};

/// Creates a periodic tick subscription while notifications are shown.
///
/// No subscription is active when the store is empty, so an idle
/// application does not wake up.
pub fn tick_subscription(has_notifications: bool, interval: TickInterval) -> Subscription<Message> {
    if has_notifications {
        time::every(interval.as_duration()).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
