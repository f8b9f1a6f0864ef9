// SPDX-License-Identifier: MPL-2.0
//! Scripted timelines replayed against a store on virtual time.
//!
//! A scenario is a TOML file with one `[[step]]` table per action:
//!
//! ```toml
//! [[step]]
//! at_ms = 0
//! action = "add"
//! message = "Saved"
//! severity = "success"
//! duration_ms = 3000
//!
//! [[step]]
//! at_ms = 2000
//! action = "pause"
//! message = "Saved"
//! ```
//!
//! Steps run in `at_ms` order on a [`ManualClock`]. Timers due between two
//! steps fire at their exact deadlines, so the printed timeline matches what
//! a user would see in real time.

use crate::diagnostics::DiagnosticsCollector;
use crate::domain::diagnostics::BufferCapacity;
use crate::domain::notification::DisplayDuration;
use crate::error::{Result, ScenarioError};
use crate::notifications::{
    Clock, DeadlineScheduler, ManualClock, NotificationId, NotificationRequest, Severity, Store,
    ToastSnapshot,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

/// What a step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Add,
    Dismiss,
    Pause,
    Resume,
    /// Only records the visible notifications.
    Observe,
}

impl Action {
    /// Returns the lowercase action name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Dismiss => "dismiss",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Observe => "observe",
        }
    }
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Milliseconds since the scenario started.
    pub at_ms: u64,
    pub action: Action,
    /// Message to show, or to look up for non-add actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    /// Requested display duration; zero or negative uses the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

/// A parsed scenario file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Reads and validates a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// Parses and validates scenario TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] if the TOML is malformed, has no steps, or
    /// a step other than `observe` lacks a `message`.
    pub fn parse(content: &str) -> std::result::Result<Self, ScenarioError> {
        let scenario: Scenario =
            toml::from_str(content).map_err(|err| ScenarioError::Parse(err.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> std::result::Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::Empty);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if step.action != Action::Observe && step.message.is_none() {
                return Err(ScenarioError::MissingMessage { step: index + 1 });
            }
        }
        Ok(())
    }

    /// Returns the steps sorted by time, keeping file order for ties.
    #[must_use]
    pub fn ordered_steps(&self) -> Vec<(usize, &Step)> {
        let mut steps: Vec<_> = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| (index + 1, step))
            .collect();
        steps.sort_by_key(|(_, step)| step.at_ms);
        steps
    }
}

/// Visible notifications right after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub at_ms: u64,
    /// 1-based position of the step in the file.
    pub step: usize,
    pub action: Action,
    /// Target of the step, if any.
    pub message: Option<String>,
    /// False when the step targeted nothing or was a no-op.
    pub applied: bool,
    pub toasts: Vec<ToastSnapshot>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>7} ms] step {} {}", self.at_ms, self.step, self.action.as_str())?;
        if let Some(message) = &self.message {
            write!(f, " {:?}", message)?;
        }
        if !self.applied {
            write!(f, " (no effect)")?;
        }
        if self.toasts.is_empty() {
            write!(f, "\n    (no notifications)")?;
        }
        for toast in &self.toasts {
            write!(
                f,
                "\n    {:<4} {:<8} {:<8} gen {:<3} {:?}",
                toast.id.to_string(),
                toast.severity.as_str(),
                toast.state.as_str(),
                toast.generation,
                toast.message
            )?;
        }
        Ok(())
    }
}

/// Replays scenarios on a virtual clock.
///
/// When diagnostics are enabled the replay owns the collector and drains
/// it after every step and every fired timer, so long timelines never
/// overflow the collector's channel.
#[derive(Debug)]
pub struct Replay {
    clock: ManualClock,
    store: Store<ManualClock, DeadlineScheduler>,
    diagnostics: Option<DiagnosticsCollector>,
}

impl Replay {
    /// Creates a replay whose store uses `default_duration` for requests
    /// without a positive duration.
    #[must_use]
    pub fn new(default_duration: DisplayDuration) -> Self {
        let clock = ManualClock::new();
        let store = Store::with_parts(clock.clone(), DeadlineScheduler::new())
            .with_default_duration(default_duration);
        Self {
            clock,
            store,
            diagnostics: None,
        }
    }

    /// Starts collecting lifecycle events, timestamped relative to the
    /// start of the replay.
    pub fn enable_diagnostics(&mut self, capacity: BufferCapacity) {
        let collector = DiagnosticsCollector::starting_at(capacity, self.clock.origin());
        self.store.set_diagnostics(collector.handle());
        self.diagnostics = Some(collector);
    }

    /// Returns the diagnostics collector, if enabled.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&DiagnosticsCollector> {
        self.diagnostics.as_ref()
    }

    /// Returns the virtual clock.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Returns the replayed store.
    #[must_use]
    pub fn store(&self) -> &Store<ManualClock, DeadlineScheduler> {
        &self.store
    }

    /// Returns virtual milliseconds since the replay started.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Moves virtual time to `at_ms`, firing every timer due on the way.
    ///
    /// Earlier times are ignored.
    pub fn advance_to(&mut self, at_ms: u64) {
        self.clock
            .set(self.clock.origin() + Duration::from_millis(at_ms));
        self.fire_due(self.clock.now());
    }

    /// Advances to the step's time and applies it.
    pub fn apply(&mut self, index: usize, step: &Step) -> Frame {
        self.advance_to(step.at_ms);

        let applied = match step.action {
            Action::Observe => true,
            Action::Add => match &step.message {
                Some(message) => {
                    let mut request = NotificationRequest::new(step.severity, message.clone());
                    if let Some(millis) = step.duration_ms {
                        request = request.with_duration_ms(millis);
                    }
                    self.store.add(request);
                    true
                }
                None => false,
            },
            Action::Dismiss => self.target(step).is_some_and(|id| self.store.dismiss(id)),
            Action::Pause => self.target(step).is_some_and(|id| self.store.pause(id)),
            Action::Resume => self.target(step).is_some_and(|id| self.store.resume(id)),
        };
        self.drain_diagnostics();

        Frame {
            at_ms: step.at_ms,
            step: index,
            action: step.action,
            message: step.message.clone(),
            applied,
            toasts: self.store.snapshot(),
        }
    }

    /// Applies every step in time order.
    pub fn run(&mut self, scenario: &Scenario) -> Vec<Frame> {
        scenario
            .ordered_steps()
            .into_iter()
            .map(|(index, step)| self.apply(index, step))
            .collect()
    }

    /// Fires remaining timers until none are pending.
    ///
    /// Paused notifications have no pending timer and stay visible.
    /// Returns the virtual time at which the last timer fired.
    pub fn settle(&mut self) -> u64 {
        while let Some(deadline) = self.store.next_deadline() {
            self.clock.set(deadline);
            self.fire_due(deadline);
        }
        self.elapsed_ms()
    }

    fn fire_due(&mut self, now: Instant) {
        while self.store.fire_due(now) {
            self.drain_diagnostics();
        }
    }

    fn drain_diagnostics(&mut self) {
        if let Some(collector) = self.diagnostics.as_mut() {
            collector.process_pending();
        }
    }

    fn target(&self, step: &Step) -> Option<NotificationId> {
        let message = step.message.as_deref()?;
        self.store
            .find(message, step.severity)
            .map(|notification| notification.id())
    }
}

impl Default for Replay {
    fn default() -> Self {
        Self::new(DisplayDuration::default())
    }
}
