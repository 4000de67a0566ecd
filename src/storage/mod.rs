//! Storage layer for wallet sign-in credentials.
//!
//! A successful wallet sign-in yields a bearer token for the marketplace API.
//! The token is persisted per address so a reconnecting wallet can reuse it
//! instead of signing the login message again.
//!
//! # Modules
//!
//! - `backend`: Credential store trait
//! - `json`: JSON file-based implementation with atomic writes
//! - `models`: Persisted record types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::CredentialStore;
pub use json::JsonCredentialStore;
pub use models::CredentialRecord;
