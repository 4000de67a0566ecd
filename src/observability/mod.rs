//! Structured logging to a rotating JSON file.
//!
//! ```text
//! tracing macros → EnvFilter → JSON fmt layer → RotatingFile (10 MB, 3 backups)
//! ```
//!
//! The log lives in the data directory as `dexy.log`. The level comes from
//! `RUST_LOG`, then the `log_level` config option, then `"info"`. Logging is
//! optional: setup failures leave the process without a subscriber.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Size-rotated file writer

pub mod file_writer;
mod init;

pub use file_writer::RotatingFile;
pub use init::{init_tracing, LOG_FILE_NAME};
