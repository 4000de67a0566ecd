//! Error types for the DeXy storefront core.
//!
//! This module defines the centralized error type [`DexyError`] and a type alias
//! [`Result`] used throughout the crate. Nothing in the storefront is fatal: every
//! variant ends up either rolled back or turned into a notification, so the error
//! also knows how to produce the message a user should see.

use thiserror::Error;

/// The main error type for storefront operations.
///
/// Variants cover the three external boundaries (REST API, wallet bridge, contract)
/// plus local concerns such as credential storage and configuration.
///
/// # Examples
///
/// ```
/// use dexy::domain::DexyError;
///
/// let err = DexyError::Api { status: 400, detail: Some("Item already sold".to_string()) };
/// assert_eq!(err.user_message("Failed to remove item"), "Item already sold");
///
/// let err = DexyError::Api { status: 502, detail: None };
/// assert_eq!(err.user_message("Failed to remove item"), "Failed to remove item");
/// ```
#[derive(Debug, Error)]
pub enum DexyError {
    /// The REST API answered with a non-success status.
    ///
    /// `detail` is the `detail` field of the JSON error body when the server sent one.
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// Transport-level failure talking to the API or the wallet bridge.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The wallet refused a request (no account, rejected signature, ...).
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The purchase transaction was rejected or reverted.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing the credential store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// User input was rejected before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl DexyError {
    /// Message shown to the user when this error aborts an operation.
    ///
    /// Server-provided details and validation messages are surfaced verbatim;
    /// everything else collapses to the operation-specific `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// A specialized `Result` type for storefront operations.
pub type Result<T> = std::result::Result<T, DexyError>;
