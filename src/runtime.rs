//! Event loop wiring the state machine to the worker and timers.
//!
//! [`Runtime`] owns the [`AppState`] and the only receiver of the loop's
//! channel. Everything that happens arrives there as an [`Incoming`] value:
//! user input lines, worker responses and elapsed timers. Actions emitted by
//! [`handle_event`] are executed on tokio tasks that report back through the
//! same channel, so state is only ever touched from the loop.
//!
//! ```text
//! stdin ─┐
//! worker ┼─▶ mpsc ─▶ Runtime::step ─▶ handle_event ─▶ actions ─▶ tokio tasks
//! timers ┘                                                          │
//!   ▲                                                               │
//!   └───────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::{handle_event, Action, AppState, Event};
use crate::worker::{DexyWorker, WorkerResponse};

/// Something the loop must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A raw input line, mapped to an event by the shell.
    Line(String),
    Worker(WorkerResponse),
    Timer(Event),
}

/// Outcome of one [`Runtime::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// An input line for the shell to interpret.
    Line(String),
    /// An internal event was handled.
    Handled { render: bool },
}

pub struct Runtime {
    state: AppState,
    worker: Arc<DexyWorker>,
    tx: mpsc::UnboundedSender<Incoming>,
    rx: mpsc::UnboundedReceiver<Incoming>,
    in_flight: usize,
    timers: usize,
}

impl Runtime {
    #[must_use]
    pub fn new(state: AppState, worker: Arc<DexyWorker>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            worker,
            tx,
            rx,
            in_flight: 0,
            timers: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Sender for input lines.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<Incoming> {
        self.tx.clone()
    }

    /// Worker requests not yet answered.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Handles `event` and executes the resulting actions.
    ///
    /// Returns whether the view must be re-rendered. Must be called from
    /// within a tokio runtime.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.state, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in actions {
                    self.execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn execute_action(&mut self, action: Action) {
        match action {
            Action::PostToWorker(message) => {
                tracing::debug!(message = ?message, "posting message to worker");
                self.in_flight += 1;
                let worker = Arc::clone(&self.worker);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let response = worker.handle_message(message).await;
                    let _ = tx.send(Incoming::Worker(response));
                });
            }
            Action::ScheduleEvent { after, event } => {
                tracing::trace!(after_ms = after.as_millis(), event = ?event, "scheduling event");
                self.timers += 1;
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Incoming::Timer(*event));
                });
            }
        }
    }

    /// Waits for the next incoming value and handles it.
    ///
    /// Worker responses and timers are dispatched here; input lines are
    /// returned untouched for the shell to map.
    pub async fn step(&mut self) -> Option<Step> {
        let incoming = self.rx.recv().await?;
        let step = match incoming {
            Incoming::Line(line) => Step::Line(line),
            Incoming::Worker(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Step::Handled {
                    render: self.dispatch(&Event::WorkerResponse(response)),
                }
            }
            Incoming::Timer(event) => {
                self.timers = self.timers.saturating_sub(1);
                Step::Handled {
                    render: self.dispatch(&event),
                }
            }
        };
        Some(step)
    }

    /// Handles incoming values until no worker request is outstanding.
    ///
    /// Timers that fire meanwhile are handled too; input lines are dropped.
    pub async fn run_until_idle(&mut self) {
        while self.in_flight > 0 {
            if let Some(Step::Line(line)) = self.step().await {
                tracing::debug!(line = %line, "dropping input while settling");
            }
        }
    }

    /// Like [`Runtime::run_until_idle`], but also waits out every pending timer.
    pub async fn run_until_quiet(&mut self) {
        while self.in_flight > 0 || self.timers > 0 {
            if let Some(Step::Line(line)) = self.step().await {
                tracing::debug!(line = %line, "dropping input while settling");
            }
        }
    }
}
