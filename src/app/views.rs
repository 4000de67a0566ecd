//! State of the item and account detail views.

use crate::domain::{Address, Item, ItemId, Offer, Transaction, UserProfile};

/// Item detail: the item, one page of its offers and the fetch status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item: Option<Item>,
    pub offers: Vec<Offer>,
    pub offer_page: u32,
    pub offer_total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ItemView {
    fn default() -> Self {
        Self {
            item: None,
            offers: Vec::new(),
            offer_page: 1,
            offer_total_pages: 1,
            loading: false,
            error: None,
        }
    }
}

impl ItemView {
    #[must_use]
    pub fn shows(&self, id: ItemId) -> bool {
        self.item.as_ref().is_some_and(|item| item.id == id)
    }
}

/// Account detail: profile, owned items and transaction history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountView {
    pub profile: Option<UserProfile>,
    pub items: Vec<Item>,
    pub transactions: Vec<Transaction>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AccountView {
    #[must_use]
    pub fn belongs_to(&self, address: &Address) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|profile| &profile.address == address)
    }

    #[must_use]
    pub fn lists_any(&self, ids: &[ItemId]) -> bool {
        self.items.iter().any(|item| ids.contains(&item.id))
    }
}
