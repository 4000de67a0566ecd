//! Offers placed on items.

use rust_decimal::Decimal;

use super::error::{DexyError, Result};
use super::item::{Address, ItemId};

/// An offer shown in an item's offer history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub price: Decimal,
    /// Server-formatted timestamp, displayed as-is.
    pub date: String,
    pub from: Address,
}

/// Contents of the place-offer dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferDraft {
    pub item_id: ItemId,
    pub price: Decimal,
    pub accept_terms: bool,
}

impl OfferDraft {
    /// Checks the draft against the bidder's balance, when known.
    ///
    /// # Errors
    ///
    /// Returns [`DexyError::Validation`] when the price is not positive, exceeds
    /// `balance`, or the terms were not accepted.
    pub fn validate(&self, balance: Option<Decimal>) -> Result<()> {
        if self.price <= Decimal::ZERO {
            return Err(DexyError::Validation(
                "Offer price must be greater than zero".to_string(),
            ));
        }
        if let Some(balance) = balance {
            if self.price > balance {
                return Err(DexyError::Validation("Insufficient balance".to_string()));
            }
        }
        if !self.accept_terms {
            return Err(DexyError::Validation(
                "You must accept the terms and conditions".to_string(),
            ));
        }
        Ok(())
    }
}
