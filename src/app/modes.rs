//! Routes of the storefront.
//!
//! The active [`Route`] decides which view is fetched on navigation and which
//! views a completed purchase can make stale.

use std::fmt;

use crate::domain::{Address, ItemId};

/// The view currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    /// Catalog listing driven by the filter.
    #[default]
    Marketplace,

    /// Item detail with its offer history.
    Item(ItemId),

    /// Account profile, owned items and transaction history.
    Account(Address),

    /// Create-item form.
    Create,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marketplace => f.write_str("/marketplace"),
            Self::Item(id) => write!(f, "/item/{id}"),
            Self::Account(address) => write!(f, "/account/{address}"),
            Self::Create => f.write_str("/create"),
        }
    }
}
