//! Persisted credential records.

use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// A bearer token issued to a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub address: Address,
    pub token: String,
    /// Unix timestamp of the sign-in that produced the token.
    pub issued_at: i64,
}

impl CredentialRecord {
    /// Creates a record issued now.
    pub fn new(address: Address, token: impl Into<String>) -> Self {
        Self {
            address,
            token: token.into(),
            issued_at: chrono::Utc::now().timestamp(),
        }
    }
}
