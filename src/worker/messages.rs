//! Request/response protocol between the event loop and the worker.
//!
//! Requests whose answers can race carry a tag: listing and view fetches a
//! sequence number, cart mutations the id the cart coordinator assigned. The
//! event loop uses the tag to drop answers that arrive too late.

use rust_decimal::Decimal;

use crate::api::{ListingQuery, Page};
use crate::domain::{
    Address, CartItem, Category, Item, ItemId, NewItem, Offer, ProfileUpdate, Transaction,
    UserProfile,
};
use crate::wallet::{BatchPurchase, TxReceipt};

/// Requests sent from the event loop to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    LoadCategories,

    /// Fetch one listing page.
    FetchListing { seq: u64, query: ListingQuery },

    /// Fetch an item together with one page of its offers.
    FetchItem { seq: u64, item_id: ItemId, offer_page: u32 },

    /// Fetch another page of an item's offers.
    FetchOffers { seq: u64, item_id: ItemId, page: u32 },

    /// Fetch an account's profile, owned items and transaction history.
    FetchAccount { seq: u64, address: Address },

    FetchCart { seq: u64 },

    AddCartItem { mutation_id: u64, item_id: ItemId },

    RemoveCartItem { mutation_id: u64, item_id: ItemId },

    /// Delete every listed cart line concurrently.
    ClearCart { mutation_id: u64, item_ids: Vec<ItemId> },

    /// Submit a `batchBuy` for the cart.
    Checkout { mutation_id: u64, purchase: BatchPurchase },

    PlaceOffer { item_id: ItemId, price: Decimal },

    UpdateProfile { address: Address, update: ProfileUpdate },

    CreateItem { draft: NewItem },

    /// Connect the wallet, sign the login message and exchange it for a token.
    SignIn,

    /// Reuse the stored token of an already connected wallet.
    RestoreSession,

    /// Disconnect the wallet and forget the token of `address`.
    SignOut { address: Option<Address> },

    FetchBalance { address: Address },
}

/// Answers sent from the worker back to the event loop.
///
/// Failure messages are already user-facing: the server's detail when it sent
/// one, an operation-specific fallback otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    CategoriesLoaded { categories: Vec<Category> },

    ListingLoaded { seq: u64, page: Page<Item> },

    ListingFailed { seq: u64, message: String },

    ItemLoaded { seq: u64, item: Item, offers: Page<Offer> },

    OffersLoaded { seq: u64, offers: Page<Offer> },

    AccountLoaded {
        seq: u64,
        profile: UserProfile,
        items: Vec<Item>,
        transactions: Vec<Transaction>,
    },

    /// An item or account fetch failed.
    ViewFailed { seq: u64, message: String },

    CartLoaded { seq: u64, items: Vec<CartItem> },

    CartLoadFailed { seq: u64, message: String },

    /// An add, remove or clear finished.
    CartMutationSettled {
        mutation_id: u64,
        outcome: Result<(), String>,
    },

    CheckoutSettled {
        mutation_id: u64,
        outcome: Result<TxReceipt, String>,
    },

    OfferPlaced { item_id: ItemId },

    ProfileUpdated { profile: UserProfile },

    ItemCreated,

    SignedIn { address: Address, reconnected: bool },

    SignInFailed { message: String },

    /// No connected wallet with a stored token was found at start.
    NoStoredSession,

    SignedOut,

    BalanceLoaded { address: Address, balance: Decimal },

    /// A request without dedicated failure handling failed.
    Error { message: String },
}
