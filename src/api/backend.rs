//! Marketplace API abstraction.
//!
//! [`MarketplaceApi`] is the seam between the storefront core and the REST
//! service. The worker only ever talks to this trait; [`crate::api::HttpApi`]
//! is the production implementation and `MockMarketplaceApi` stands in for it
//! in tests.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::api::models::Page;
use crate::api::query::ListingQuery;
use crate::domain::{
    Address, CartItem, Category, Item, ItemId, NewItem, Offer, ProfileUpdate, Result,
    Transaction, UserProfile,
};

/// Operations of the marketplace REST API.
///
/// Every method fails with [`crate::domain::DexyError::Api`] when the server
/// answers with a non-success status, carrying the server's `detail` message
/// when it sent one.
#[automock]
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Sets or clears the bearer token attached to every later request.
    fn set_token(&self, token: Option<String>);

    /// `GET /items`: one page of the catalog.
    async fn list_items(&self, query: &ListingQuery) -> Result<Page<Item>>;

    /// `GET /items/{id}`
    async fn item(&self, id: ItemId) -> Result<Item>;

    /// `GET /items/{id}/offers`: offer history, newest first.
    async fn item_offers(&self, id: ItemId, page: u32, limit: u32) -> Result<Page<Offer>>;

    /// `POST /offers`
    async fn place_offer(&self, item_id: ItemId, price: Decimal) -> Result<()>;

    /// `POST /items/create-item`
    async fn create_item(&self, draft: &NewItem) -> Result<()>;

    /// `GET /categories`
    async fn categories(&self) -> Result<Vec<Category>>;

    /// `GET /shopping-cart-items`: the signed-in wallet's cart.
    async fn cart_items(&self) -> Result<Vec<CartItem>>;

    /// `POST /shopping-cart-items`
    async fn add_cart_item(&self, item_id: ItemId) -> Result<()>;

    /// `DELETE /shopping-cart-items/{id}`
    async fn remove_cart_item(&self, item_id: ItemId) -> Result<()>;

    /// `GET /users/{address}`
    async fn user(&self, address: &Address) -> Result<UserProfile>;

    /// `PUT /users/{address}`
    async fn update_user(&self, address: &Address, update: &ProfileUpdate) -> Result<UserProfile>;

    /// `GET /users/{address}/items`: items owned by `address`.
    async fn user_items(&self, address: &Address) -> Result<Vec<Item>>;

    /// `GET /transactions`: history involving `address`.
    async fn transactions(&self, address: &Address) -> Result<Vec<Transaction>>;

    /// `POST /auth/login`: exchanges a signed login message for a bearer token.
    async fn login(&self, address: &Address, message: &str, signature: &str) -> Result<String>;
}
