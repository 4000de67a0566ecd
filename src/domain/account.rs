//! User profiles and transaction history.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::{DexyError, Result};
use super::item::Address;

/// Public profile of a wallet owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub address: Address,
    pub username: Option<String>,
    pub email: Option<String>,
    /// Base64-encoded avatar image.
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Username if set, otherwise the abbreviated address.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| self.address.short(), str::to_string)
    }
}

/// Body of `PUT /users/{address}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns [`DexyError::Validation`] when a non-empty email lacks an `@`.
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(DexyError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }
}

/// One row of an account's transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub event: String,
    pub item_name: String,
    pub price: Decimal,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub date: String,
}
