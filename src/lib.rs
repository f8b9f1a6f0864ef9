// SPDX-License-Identifier: MPL-2.0
//! `iced_toasts` manages transient "toast" notifications.
//!
//! Notifications are shown for a bounded time, can be paused while the
//! pointer hovers them, are deduplicated by message and severity, and leave
//! through a short exit transition. The core [`notifications::Store`] is
//! independent of any GUI; [`app`] plugs it into an iced application and
//! [`runtime`] runs it as a Tokio service.

#![doc(html_root_url = "https://docs.rs/iced_toasts/0.1.0")]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod notifications;
pub mod runtime;
pub mod scenario;
