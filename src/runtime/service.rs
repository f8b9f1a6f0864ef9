// SPDX-License-Identifier: MPL-2.0
//! Notification service running as a Tokio task.
//!
//! The [`ToastService`] owns a [`Store`] and is its only writer. Callers
//! talk to it through cloneable [`Toaster`] handles; renderers watch the
//! published [`ToastSnapshot`] list. Commands and fired timers are applied
//! one at a time, so every observer sees whole transitions only.

use super::scheduler::{TokioClock, TokioScheduler};
use crate::diagnostics::DiagnosticsHandle;
use crate::domain::notification::DisplayDuration;
use crate::notifications::{NotificationId, NotificationRequest, Store, TimerEvent, ToastSnapshot};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// Commands accepted by the service task.
#[derive(Debug)]
enum Command {
    Add {
        request: NotificationRequest,
        reply: Option<oneshot::Sender<NotificationId>>,
    },
    Dismiss(NotificationId),
    Pause(NotificationId),
    Resume(NotificationId),
    Remove(NotificationId),
}

/// Handle for submitting notifications to a running [`ToastService`].
///
/// Cheap to clone. The service stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct Toaster {
    command_tx: mpsc::UnboundedSender<Command>,
    snapshot_rx: watch::Receiver<Vec<ToastSnapshot>>,
}

impl Toaster {
    /// Shows a notification and waits for its id.
    ///
    /// Returns `None` if the service is no longer running.
    pub async fn add(&self, request: NotificationRequest) -> Option<NotificationId> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Add {
                request,
                reply: Some(reply_tx),
            })
            .ok()?;
        reply_rx.await.ok()
    }

    /// Shows a notification without waiting.
    ///
    /// Returns `false` if the service is no longer running.
    pub fn notify(&self, request: NotificationRequest) -> bool {
        self.send(Command::Add {
            request,
            reply: None,
        })
    }

    /// Starts the exit transition of a notification.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.send(Command::Dismiss(id))
    }

    /// Pauses a notification's countdown.
    pub fn pause(&self, id: NotificationId) -> bool {
        self.send(Command::Pause(id))
    }

    /// Resumes a paused countdown.
    pub fn resume(&self, id: NotificationId) -> bool {
        self.send(Command::Resume(id))
    }

    /// Removes a notification without an exit transition.
    pub fn remove(&self, id: NotificationId) -> bool {
        self.send(Command::Remove(id))
    }

    /// Returns a receiver notified whenever the visible list changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ToastSnapshot>> {
        self.snapshot_rx.clone()
    }

    /// Returns the most recently published list.
    #[must_use]
    pub fn current(&self) -> Vec<ToastSnapshot> {
        self.snapshot_rx.borrow().clone()
    }

    fn send(&self, command: Command) -> bool {
        self.command_tx.send(command).is_ok()
    }
}

/// Owns the store and applies commands and timers in arrival order.
pub struct ToastService {
    store: Store<TokioClock, TokioScheduler>,
    command_rx: mpsc::UnboundedReceiver<Command>,
    fired_rx: mpsc::UnboundedReceiver<TimerEvent>,
    snapshot_tx: watch::Sender<Vec<ToastSnapshot>>,
}

impl ToastService {
    /// Creates the service and its first [`Toaster`] handle.
    #[must_use]
    pub fn new(default_duration: DisplayDuration) -> (Self, Toaster) {
        let (scheduler, fired_rx) = TokioScheduler::new();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Vec::new());

        let service = Self {
            store: Store::with_parts(TokioClock, scheduler).with_default_duration(default_duration),
            command_rx,
            fired_rx,
            snapshot_tx,
        };
        let toaster = Toaster {
            command_tx,
            snapshot_rx,
        };
        (service, toaster)
    }

    /// Sets the diagnostics handle for logging lifecycle transitions.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.store.set_diagnostics(handle);
    }

    /// Spawns [`ToastService::run`] on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until every [`Toaster`] is dropped, then cancels all timers.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => self.apply(command),
                        None => break,
                    }
                }
                Some(event) = self.fired_rx.recv() => {
                    self.store.handle_timer(event);
                }
            }
            self.publish();
        }

        self.store.clear();
        self.publish();
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Add { request, reply } => {
                let id = self.store.add(request);
                if let Some(reply) = reply {
                    // Caller stopped waiting
                    let _ = reply.send(id);
                }
            }
            Command::Dismiss(id) => {
                self.store.dismiss(id);
            }
            Command::Pause(id) => {
                self.store.pause(id);
            }
            Command::Resume(id) => {
                self.store.resume(id);
            }
            Command::Remove(id) => {
                self.store.remove(id);
            }
        }
    }

    fn publish(&self) {
        let snapshot = self.store.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::LifecycleState;
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn state_of(toaster: &Toaster, id: NotificationId) -> Option<LifecycleState> {
        toaster
            .current()
            .into_iter()
            .find(|toast| toast.id == id)
            .map(|toast| toast.state)
    }

    #[tokio::test(start_paused = true)]
    async fn notification_expires_then_disappears() {
        let (service, toaster) = ToastService::new(DisplayDuration::default());
        service.spawn();

        let id = toaster
            .add(NotificationRequest::success("Saved").with_duration_ms(3000))
            .await
            .expect("service running");

        tokio::time::sleep(ms(2999)).await;
        assert_eq!(state_of(&toaster, id), Some(LifecycleState::Active));

        tokio::time::sleep(ms(2)).await;
        assert_eq!(state_of(&toaster, id), Some(LifecycleState::Exiting));

        tokio::time::sleep(ms(300)).await;
        assert_eq!(state_of(&toaster, id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn re_adding_restarts_the_countdown() {
        let (service, toaster) = ToastService::new(DisplayDuration::default());
        service.spawn();
        let request = NotificationRequest::success("X").with_duration_ms(3000);

        let id = toaster.add(request.clone()).await.expect("service running");
        tokio::time::sleep(ms(2000)).await;
        let again = toaster.add(request).await.expect("service running");
        assert_eq!(id, again);

        tokio::time::sleep(ms(2000)).await;
        let current = toaster.current();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].generation, 1);

        tokio::time::sleep(ms(1400)).await;
        assert!(toaster.current().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn paused_notification_outlives_its_duration() {
        let (service, toaster) = ToastService::new(DisplayDuration::default());
        service.spawn();

        let id = toaster
            .add(NotificationRequest::info("Y").with_duration_ms(3000))
            .await
            .expect("service running");
        tokio::time::sleep(ms(2000)).await;
        assert!(toaster.pause(id));

        tokio::time::sleep(ms(5000)).await;
        assert_eq!(state_of(&toaster, id), Some(LifecycleState::Paused));

        assert!(toaster.resume(id));
        tokio::time::sleep(ms(500)).await;
        assert_eq!(state_of(&toaster, id), Some(LifecycleState::Active));

        tokio::time::sleep(ms(850)).await;
        assert_eq!(state_of(&toaster, id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_changes() {
        let (service, toaster) = ToastService::new(DisplayDuration::default());
        let mut updates = toaster.subscribe();
        service.spawn();

        toaster.notify(NotificationRequest::warning("Low disk"));
        updates.changed().await.expect("service running");

        let visible = updates.borrow_and_update().clone();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "Low disk");
    }

    #[tokio::test(start_paused = true)]
    async fn service_stops_when_handles_are_dropped() {
        let (service, toaster) = ToastService::new(DisplayDuration::default());
        let task = service.spawn();

        toaster.notify(NotificationRequest::info("bye"));
        drop(toaster);

        task.await.expect("service task should finish cleanly");
    }

    #[tokio::test(start_paused = true)]
    async fn remove_skips_exit_transition() {
        let (service, toaster) = ToastService::new(DisplayDuration::default());
        service.spawn();

        let id = toaster
            .add(NotificationRequest::error("Failed"))
            .await
            .expect("service running");
        toaster.remove(id);
        tokio::time::sleep(ms(1)).await;

        assert!(toaster.current().is_empty());
    }
}
