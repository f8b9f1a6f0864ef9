// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report generation and JSON export.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DiagnosticEventKind, ExitReason, LifecycleTransition};

// =============================================================================
// Report Metadata
// =============================================================================

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// When the report was generated (ISO 8601)
    pub generated_at: String,
    /// Version of the crate that generated the report
    pub version: String,
    /// When diagnostic collection started (ISO 8601)
    pub collection_started_at: String,
    /// Duration of collection in milliseconds
    pub collection_duration_ms: u64,
    /// Number of events in the report
    pub event_count: usize,
    /// Events dropped because the buffer was full
    pub evicted_count: u64,
    /// Events dropped because the channel was full
    pub dropped_count: u64,
}

impl ReportMetadata {
    /// Creates new report metadata.
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
        evicted_count: u64,
        dropped_count: u64,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
            evicted_count,
            dropped_count,
        }
    }
}

// =============================================================================
// Serializable Event
// =============================================================================

/// A diagnostic event with its timestamp made relative to collection start.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SerializableEvent {
    /// Milliseconds since collection started
    pub timestamp_ms: u64,
    /// The event data
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    /// Creates a serializable event from a diagnostic event.
    ///
    /// Events stamped before `collection_start` are reported at 0 ms.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn new(
        event_timestamp: Instant,
        collection_start: Instant,
        kind: DiagnosticEventKind,
    ) -> Self {
        let timestamp_ms = event_timestamp
            .saturating_duration_since(collection_start)
            .as_millis() as u64;

        Self { timestamp_ms, kind }
    }
}

// =============================================================================
// Report Summary
// =============================================================================

/// Transition counts computed from the events of a report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub created: usize,
    pub reset: usize,
    pub revived: usize,
    pub paused: usize,
    pub resumed: usize,
    pub expired: usize,
    pub dismissed: usize,
    pub removed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl ReportSummary {
    /// Counts transitions by kind.
    #[must_use]
    pub fn from_events(events: &[SerializableEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            match &event.kind {
                DiagnosticEventKind::Lifecycle { event } => match event.transition {
                    LifecycleTransition::Created { .. } => summary.created += 1,
                    LifecycleTransition::Reset { revived, .. } => {
                        summary.reset += 1;
                        if revived {
                            summary.revived += 1;
                        }
                    }
                    LifecycleTransition::Paused { .. } => summary.paused += 1,
                    LifecycleTransition::Resumed { .. } => summary.resumed += 1,
                    LifecycleTransition::Exiting {
                        reason: ExitReason::Expired,
                    } => summary.expired += 1,
                    LifecycleTransition::Exiting {
                        reason: ExitReason::Dismissed,
                    } => summary.dismissed += 1,
                    LifecycleTransition::Removed => summary.removed += 1,
                },
                DiagnosticEventKind::Warning { .. } => summary.warnings += 1,
                DiagnosticEventKind::Error { .. } => summary.errors += 1,
            }
        }
        summary
    }
}

// =============================================================================
// Diagnostic Report
// =============================================================================

/// A complete diagnostic report.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Collected events, oldest first
    pub events: Vec<SerializableEvent>,
    /// Summary statistics (computed from events)
    pub summary: ReportSummary,
}

impl DiagnosticReport {
    /// Creates a new diagnostic report with summary computed automatically.
    #[must_use]
    pub fn new(metadata: ReportMetadata, events: Vec<SerializableEvent>) -> Self {
        let summary = ReportSummary::from_events(&events);
        Self {
            metadata,
            events,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LifecycleEvent;
    use crate::notifications::NotificationId;
    use std::time::Duration;

    fn lifecycle(transition: LifecycleTransition) -> DiagnosticEventKind {
        DiagnosticEventKind::Lifecycle {
            event: LifecycleEvent::new(NotificationId::from_raw(1), transition),
        }
    }

    #[test]
    fn serializable_event_uses_relative_timestamp() {
        let start = Instant::now();
        let event = SerializableEvent::new(
            start + Duration::from_millis(1500),
            start,
            lifecycle(LifecycleTransition::Removed),
        );
        assert_eq!(event.timestamp_ms, 1500);
    }

    #[test]
    fn events_before_collection_start_are_clamped_to_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        let event = SerializableEvent::new(
            Instant::now(),
            start,
            lifecycle(LifecycleTransition::Removed),
        );
        assert_eq!(event.timestamp_ms, 0);
    }

    #[test]
    fn summary_counts_each_transition() {
        let start = Instant::now();
        let events: Vec<_> = [
            lifecycle(LifecycleTransition::Created {
                severity: crate::notifications::Severity::Info,
                duration_ms: 3000,
            }),
            lifecycle(LifecycleTransition::Reset {
                generation: 1,
                revived: true,
            }),
            lifecycle(LifecycleTransition::Paused { remaining_ms: 10 }),
            lifecycle(LifecycleTransition::Resumed { remaining_ms: 10 }),
            lifecycle(LifecycleTransition::Exiting {
                reason: ExitReason::Dismissed,
            }),
            lifecycle(LifecycleTransition::Removed),
            DiagnosticEventKind::Warning {
                notification_id: NotificationId::from_raw(1),
                message: "careful".into(),
            },
        ]
        .into_iter()
        .map(|kind| SerializableEvent::new(start, start, kind))
        .collect();

        let summary = ReportSummary::from_events(&events);

        assert_eq!(summary.created, 1);
        assert_eq!(summary.reset, 1);
        assert_eq!(summary.revived, 1);
        assert_eq!(summary.paused, 1);
        assert_eq!(summary.resumed, 1);
        assert_eq!(summary.dismissed, 1);
        assert_eq!(summary.expired, 0);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn report_serializes_with_metadata_and_summary() {
        let metadata = ReportMetadata::new(Utc::now(), 42, 0, 0, 0);
        let report = DiagnosticReport::new(metadata, Vec::new());

        let json = serde_json::to_string(&report).expect("serialize report");
        assert!(json.contains("\"collection_duration_ms\":42"));
        assert!(json.contains("\"summary\""));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }
}
