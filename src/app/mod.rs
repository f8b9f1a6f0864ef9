// SPDX-License-Identifier: MPL-2.0
//! iced integration for the notification store.
//!
//! An iced application keeps a [`Store`](crate::notifications::Store) in its
//! state, forwards [`Message`]s to [`update`] and subscribes to
//! [`tick_subscription`] so timers fire while toasts are visible.
//!
//! ```ignore
//! fn update(&mut self, message: AppMessage) {
//!     match message {
//!         AppMessage::Notification(msg) => app::update(&mut self.toasts, msg),
//!         // ...
//!     }
//! }
//!
//! fn subscription(&self) -> Subscription<AppMessage> {
//!     app::tick_subscription(self.toasts.has_notifications(), self.tick_interval)
//!         .map(AppMessage::Notification)
//! }
//! ```

mod message;
mod subscription;

pub use message::{update, Message};
pub use subscription::tick_subscription;
