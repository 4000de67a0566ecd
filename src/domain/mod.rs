//! Domain layer for the DeXy storefront.
//!
//! This module contains the marketplace types the rest of the crate trades in,
//! independent of the REST wire format, the wallet bridge, or the renderer.
//! Wire records are converted into these types at the `api` boundary.
//!
//! # Organization
//!
//! - [`error`]: Error type and result alias
//! - [`item`]: Items, item ids and wallet addresses
//! - [`catalog`]: Sort keys and the category directory
//! - [`cart`]: Cart lines and price totals
//! - [`offer`]: Offers and offer drafts
//! - [`account`]: User profiles and transaction history
//! - [`notification`]: Transient user-facing notifications
//!
//! # Examples
//!
//! ```
//! use dexy::domain::{Address, Result};
//!
//! fn owner() -> Result<Address> {
//!     Address::parse("0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d")
//! }
//! # assert!(owner().is_ok());
//! ```

pub mod account;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod item;
pub mod notification;
pub mod offer;

pub use account::{ProfileUpdate, Transaction, UserProfile};
pub use cart::{display_total, total_price, CartItem};
pub use catalog::{Categories, Category, SortKey, ALL_CATEGORIES};
pub use error::{DexyError, Result};
pub use item::{Address, Item, ItemId, NewItem};
pub use notification::{Notification, NotificationLevel};
pub use offer::{Offer, OfferDraft};
