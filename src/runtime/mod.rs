// SPDX-License-Identifier: MPL-2.0
//! Tokio runtime integration.
//!
//! - [`TokioScheduler`] / [`TokioClock`]: real timers for a [`Store`](crate::notifications::Store)
//! - [`ToastService`] / [`Toaster`]: a store running in its own task,
//!   shared by any number of callers

mod scheduler;
mod service;

pub use scheduler::{TokioClock, TokioScheduler};
pub use service::{ToastService, Toaster};
