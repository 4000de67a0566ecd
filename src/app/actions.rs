//! Side effects requested by the event handler.
//!
//! The handler never performs I/O. It returns a `Vec<Action>` and the runtime
//! executes them: worker requests run on tokio tasks, scheduled events are fed
//! back into the loop after their delay.
//!
//! # Example
//!
//! ```rust
//! use dexy::app::Action;
//! use dexy::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::LoadCategories)];
//! assert_eq!(actions.len(), 1);
//! ```

use std::time::Duration;

use crate::app::handler::Event;
use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hands a request to the background worker.
    PostToWorker(WorkerMessage),

    /// Feeds `event` back into the loop after `after`.
    ///
    /// Used for the search debounce and notification expiry. Scheduled events
    /// are never cancelled; they carry enough context to be ignored when they
    /// are no longer relevant.
    ScheduleEvent { after: Duration, event: Box<Event> },
}
