// SPDX-License-Identifier: MPL-2.0
//! Toast notification lifecycle management.
//!
//! Notifications appear for a limited time, can be paused while hovered,
//! dismissed early, and re-triggered by showing the same message again.
//!
//! # Components
//!
//! - [`notification`] types: `Notification`, `NotificationRequest`, `Severity`
//! - [`timer`]: per-notification state machine (`Active`, `Paused`,
//!   `Exiting`, `Removed`)
//! - [`scheduler`]: cancellable one-shot timers, keyed by deadline
//! - [`clock`]: time source abstraction (`SystemClock`, `ManualClock`)
//! - [`store`]: the ordered collection with deduplication
//!
//! # Usage
//!
//! ```
//! use iced_toasts::notifications::{Clock, ManualClock, DeadlineScheduler, NotificationRequest, Store};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut store = Store::with_parts(clock.clone(), DeadlineScheduler::new());
//!
//! let id = store.add(NotificationRequest::success("Image saved").with_duration_ms(3000));
//! assert!(store.get(id).is_some());
//!
//! clock.advance(Duration::from_millis(3300));
//! store.tick(clock.now());
//! assert!(store.is_empty());
//! ```

pub mod clock;
pub mod notification;
pub mod scheduler;
pub mod store;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notification::{
    IdGenerator, LifecycleState, Notification, NotificationId, NotificationRequest, Severity,
    ToastSnapshot,
};
pub use scheduler::{DeadlineScheduler, Scheduler, TimerEvent, TimerHandle, TimerKind};
pub use store::Store;
pub use timer::{Fired, NotificationTimer, EXIT_TRANSITION};
