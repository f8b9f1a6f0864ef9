// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects with ZERO external dependencies.
//!
//! This module contains pure domain types and the range rules attached to
//! them. It has no dependencies on external crates (except `std`) to ensure
//! testability.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`notification`]: Notification timing types
//!   ([`DisplayDuration`](notification::DisplayDuration),
//!   [`TickInterval`](notification::TickInterval))

pub mod diagnostics;
pub mod notification;
