//! View model types representing renderable UI state.
//!
//! View models are computed from application state and contain only
//! display-ready data: formatted prices, shortened addresses and highlight
//! ranges. They carry no business logic.
//!
//! # Architecture
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer.
//!
//! # Example
//!
//! ```rust
//! use dexy::domain::ItemId;
//! use dexy::ui::viewmodel::DisplayItem;
//!
//! let row = DisplayItem {
//!     id: ItemId(3),
//!     name: "Ape #3".to_string(),
//!     price: "0.25".to_string(),
//!     owner: "0x1aba...ae5d".to_string(),
//!     in_cart: false,
//!     highlight_ranges: vec![(0, 2)],
//! };
//! assert_eq!(row.highlight_ranges.len(), 1);
//! ```

use crate::domain::{ItemId, NotificationLevel};

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    /// Content of the active route.
    pub body: Body,
    /// Cart panel, present while the cart is open.
    pub cart: Option<CartInfo>,
    /// Oldest first.
    pub notifications: Vec<NotificationInfo>,
    pub footer: FooterInfo,
}

/// Title bar: route title and the signed-in wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Short address and balance, or the sign-in status.
    pub account: String,
}

/// Route-specific content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Marketplace(MarketplaceInfo),
    Item(ItemDetailInfo),
    Account(AccountInfo),
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceInfo {
    pub filter: FilterBarInfo,
    pub items: Vec<DisplayItem>,
    pub page: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
    /// Set when a settled listing has no rows.
    pub empty_state: Option<EmptyState>,
}

/// Current filter values, formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarInfo {
    pub search: String,
    pub min_price: String,
    pub max_price: String,
    pub sort: String,
    pub category: String,
    /// Known category names, for the picker.
    pub categories: Vec<String>,
}

/// One listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: ItemId,
    pub name: String,
    pub price: String,
    /// Shortened owner address.
    pub owner: String,
    pub in_cart: bool,

    /// Character ranges of `name` matched by the search text.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetailInfo {
    pub name: String,
    pub description: String,
    pub price: String,
    pub owner: String,
    pub offers: Vec<OfferRow>,
    pub offer_page: u32,
    pub offer_total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRow {
    pub price: String,
    pub from: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    pub display_name: String,
    pub email: String,
    pub items: Vec<DisplayItem>,
    pub transactions: Vec<TransactionRow>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub event: String,
    pub item_name: String,
    pub price: String,
    pub date: String,
}

/// Open cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartInfo {
    pub lines: Vec<CartLine>,
    /// Total rounded to three decimals.
    pub total: String,
    pub loading: bool,
    /// A mutation is in flight; destructive controls are disabled.
    pub busy: bool,
    /// Checkout is in flight.
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: ItemId,
    pub name: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationInfo {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

/// Command hints for the active route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub commands: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
