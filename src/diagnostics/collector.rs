// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! The collector owns the circular buffer. Producers (notification stores,
//! runtime services) hold cheap [`DiagnosticsHandle`]s and send events
//! through a bounded channel; the owner drains the channel with
//! [`DiagnosticsCollector::process_pending`].

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};

use super::{
    BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind, DiagnosticReport,
    LifecycleEvent, ReportMetadata, SerializableEvent,
};
use crate::error::Result;

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Handle for sending diagnostic events to the collector.
///
/// This handle is cheap to clone and can be shared across threads.
/// Sends never block: when the channel is full the event is dropped and
/// counted, and the count shows up in the report.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
    dropped: Arc<AtomicU64>,
}

impl DiagnosticsHandle {
    /// Logs a lifecycle transition that happened at `at`.
    pub fn log_lifecycle(&self, event: LifecycleEvent, at: Instant) {
        self.send(DiagnosticEvent::with_timestamp(
            DiagnosticEventKind::Lifecycle { event },
            at,
        ));
    }

    /// Logs an event of any kind.
    pub fn log(&self, kind: DiagnosticEventKind, at: Instant) {
        self.send(DiagnosticEvent::with_timestamp(kind, at));
    }

    fn send(&self, event: DiagnosticEvent) {
        if self.event_tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Collects diagnostic events into a bounded buffer.
#[derive(Debug)]
pub struct DiagnosticsCollector {
    /// Circular buffer storing diagnostic events.
    buffer: CircularBuffer<DiagnosticEvent>,
    /// Receiver for incoming events.
    event_rx: Receiver<DiagnosticEvent>,
    /// Sender stored to create handles.
    event_tx: Sender<DiagnosticEvent>,
    /// Events handles could not send.
    dropped: Arc<AtomicU64>,
    /// When collection started (monotonic, same timeline as event stamps).
    collection_started_at: Instant,
    /// When collection started (wall clock for report metadata).
    collection_started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    /// Creates a new diagnostics collector with the specified buffer capacity.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::starting_at(capacity, Instant::now())
    }

    /// Creates a collector whose relative timestamps are measured from
    /// `started_at`, e.g. the origin of a virtual clock.
    #[must_use]
    pub fn starting_at(capacity: BufferCapacity, started_at: Instant) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            dropped: Arc::new(AtomicU64::new(0)),
            collection_started_at: started_at,
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Moves all pending events from the channel into the buffer.
    ///
    /// Call this periodically (e.g., on each tick) so the channel never
    /// fills up.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    /// Returns the number of events currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no events are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    /// Clears all stored events.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns how many events were lost because the channel was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Returns the buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Builds a diagnostic report from the current buffer contents.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn build_report(&self) -> DiagnosticReport {
        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();

        let collection_duration_ms = self
            .buffer
            .iter()
            .map(|event| event.timestamp)
            .max()
            .unwrap_or(self.collection_started_at)
            .saturating_duration_since(self.collection_started_at)
            .as_millis() as u64;

        let metadata = ReportMetadata::new(
            self.collection_started_at_utc,
            collection_duration_ms,
            events.len(),
            self.buffer.evicted(),
            self.dropped(),
        );

        DiagnosticReport::new(metadata, events)
    }

    /// Exports all collected events as a pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.build_report())?)
    }

    /// Writes the JSON report to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
