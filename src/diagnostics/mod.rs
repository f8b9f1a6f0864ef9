// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording notification activity.
//!
//! Stores report every lifecycle transition to a [`DiagnosticsHandle`].
//! The [`DiagnosticsCollector`] keeps the most recent events in a
//! memory-bounded [`CircularBuffer`] and exports them as a JSON report.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped [`DiagnosticEventKind`]
//! - [`DiagnosticsCollector`] / [`DiagnosticsHandle`]: channel-backed sink
//! - [`DiagnosticReport`]: Serializable export with a [`ReportSummary`]

mod buffer;
mod collector;
mod events;
mod report;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    DiagnosticEvent, DiagnosticEventKind, ExitReason, LifecycleEvent, LifecycleTransition,
};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent};
