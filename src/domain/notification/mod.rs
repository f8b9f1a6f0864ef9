// SPDX-License-Identifier: MPL-2.0
//! Notification domain types.
//!
//! This module contains timing value objects that are independent
//! of any scheduler or presentation framework.

mod newtypes;

pub use newtypes::{display_duration_bounds, tick_interval_bounds, DisplayDuration, TickInterval};
