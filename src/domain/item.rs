//! Marketplace items, their identifiers and owner addresses.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{DexyError, Result};

/// Identifier of a tokenized item, as assigned by the marketplace API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = DexyError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DexyError::Validation(format!("Invalid item id: {s}")))
    }
}

/// An EVM account address (`0x` followed by 40 hex digits).
///
/// Addresses are stored lowercased so that equality ignores the EIP-55
/// checksum casing the API and the wallet may disagree on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parses and normalizes an address.
    ///
    /// # Errors
    ///
    /// Returns [`DexyError::Validation`] if the input is not `0x` + 40 hex digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| DexyError::Validation(format!("Invalid address: {raw}")))?;

        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DexyError::Validation(format!("Invalid address: {raw}")));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in headers and tables: `0x1aba...ae5d`.
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = DexyError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

/// An item as listed on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Base64-encoded PNG, opaque to this crate.
    pub image: String,
    /// Fixed ("buy now") price in ether.
    pub price: Decimal,
    pub owner: Address,
    pub description: Option<String>,
    pub start_price: Option<Decimal>,
}

/// Draft of a new listing, as entered in the create-item form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub start_price: Decimal,
    pub fix_price: Decimal,
    pub accept_rights: bool,
    pub accept_terms: bool,
}

impl NewItem {
    /// Checks the draft before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns [`DexyError::Validation`] when either acknowledgement is missing,
    /// the name is blank, or a price is negative.
    pub fn validate(&self) -> Result<()> {
        if !self.accept_rights || !self.accept_terms {
            return Err(DexyError::Validation(
                "You must accept the terms and conditions".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(DexyError::Validation("Item name is required".to_string()));
        }
        if self.start_price.is_sign_negative() || self.fix_price.is_sign_negative() {
            return Err(DexyError::Validation("Prices cannot be negative".to_string()));
        }
        Ok(())
    }
}
