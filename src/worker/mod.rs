//! Background worker executing network requests off the event loop.
//!
//! - `messages`: Request/response protocol with sequence and mutation tags
//! - `handler`: Worker implementation dispatching to the API, wallet and contract

pub mod handler;
pub mod messages;

pub use handler::DexyWorker;
pub use messages::{WorkerMessage, WorkerResponse};
