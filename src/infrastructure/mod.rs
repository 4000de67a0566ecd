//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{credentials_path, data_dir, expand_tilde};
