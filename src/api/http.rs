//! `reqwest` implementation of [`MarketplaceApi`].

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::api::backend::MarketplaceApi;
use crate::api::models::{
    Envelope, ErrorBody, ItemRecord, LoginResponse, OfferRecord, Page, PageEnvelope,
    TransactionRecord, UserRecord,
};
use crate::api::query::ListingQuery;
use crate::domain::{
    Address, CartItem, Category, DexyError, Item, ItemId, NewItem, Offer, ProfileUpdate, Result,
    Transaction, UserProfile,
};

/// HTTP client for the marketplace API.
///
/// Holds the bearer token obtained at sign-in and attaches it to every request
/// while one is set.
#[derive(Debug)]
pub struct HttpApi {
    base_url: String,
    http: Client,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
            token: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().ok().and_then(|guard| guard.clone());
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.detail_text());

            tracing::debug!(status = status.as_u16(), body = %text, "api request failed");

            return Err(DexyError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketplaceApi for HttpApi {
    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    async fn list_items(&self, query: &ListingQuery) -> Result<Page<Item>> {
        let request = self.http.get(self.url("/items")).query(&query.params());
        let page: PageEnvelope<ItemRecord> = self.fetch(request).await?;
        Ok(Page::from(page).map(Item::from))
    }

    async fn item(&self, id: ItemId) -> Result<Item> {
        let request = self.http.get(self.url(&format!("/items/{id}")));
        let body: Envelope<ItemRecord> = self.fetch(request).await?;
        Ok(body.data.into())
    }

    async fn item_offers(&self, id: ItemId, page: u32, limit: u32) -> Result<Page<Offer>> {
        let request = self
            .http
            .get(self.url(&format!("/items/{id}/offers")))
            .query(&[("page", page), ("limit", limit)]);
        let page: PageEnvelope<OfferRecord> = self.fetch(request).await?;
        Ok(Page::from(page).map(Offer::from))
    }

    async fn place_offer(&self, item_id: ItemId, price: Decimal) -> Result<()> {
        let body = serde_json::json!({
            "item_id": item_id,
            "offer_price": price.normalize().to_string(),
        });
        self.send(self.http.post(self.url("/offers")).json(&body)).await?;
        Ok(())
    }

    async fn create_item(&self, draft: &NewItem) -> Result<()> {
        let body = serde_json::json!({
            "name": draft.name,
            "description": draft.description,
            "start_price": draft.start_price.normalize().to_string(),
            "fix_price": draft.fix_price.normalize().to_string(),
        });
        self.send(self.http.post(self.url("/items/create-item")).json(&body))
            .await?;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let body: Envelope<Vec<Category>> = self.fetch(self.http.get(self.url("/categories"))).await?;
        Ok(body.data)
    }

    async fn cart_items(&self) -> Result<Vec<CartItem>> {
        let request = self.http.get(self.url("/shopping-cart-items"));
        let body: Envelope<Vec<ItemRecord>> = self.fetch(request).await?;
        Ok(body.data.into_iter().map(CartItem::from).collect())
    }

    async fn add_cart_item(&self, item_id: ItemId) -> Result<()> {
        let body = serde_json::json!({ "item_id": item_id });
        self.send(self.http.post(self.url("/shopping-cart-items")).json(&body))
            .await?;
        Ok(())
    }

    async fn remove_cart_item(&self, item_id: ItemId) -> Result<()> {
        let request = self
            .http
            .delete(self.url(&format!("/shopping-cart-items/{item_id}")));
        self.send(request).await?;
        Ok(())
    }

    async fn user(&self, address: &Address) -> Result<UserProfile> {
        let request = self.http.get(self.url(&format!("/users/{address}")));
        let body: Envelope<UserRecord> = self.fetch(request).await?;
        Ok(body.data.into())
    }

    async fn update_user(&self, address: &Address, update: &ProfileUpdate) -> Result<UserProfile> {
        let request = self
            .http
            .put(self.url(&format!("/users/{address}")))
            .json(update);
        let body: Envelope<UserRecord> = self.fetch(request).await?;
        Ok(body.data.into())
    }

    async fn user_items(&self, address: &Address) -> Result<Vec<Item>> {
        let request = self.http.get(self.url(&format!("/users/{address}/items")));
        let body: Envelope<Vec<ItemRecord>> = self.fetch(request).await?;
        Ok(body.data.into_iter().map(Item::from).collect())
    }

    async fn transactions(&self, address: &Address) -> Result<Vec<Transaction>> {
        let request = self
            .http
            .get(self.url("/transactions"))
            .query(&[("address", address.as_str())]);
        let body: Envelope<Vec<TransactionRecord>> = self.fetch(request).await?;
        Ok(body.data.into_iter().map(Transaction::from).collect())
    }

    async fn login(&self, address: &Address, message: &str, signature: &str) -> Result<String> {
        let body = serde_json::json!({
            "address": address,
            "message": message,
            "signature": signature,
        });
        let request = self.http.post(self.url("/auth/login")).json(&body);
        let parsed: LoginResponse = self.fetch(request).await?;
        Ok(parsed.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpApi::new("http://localhost:8000/");
        assert_eq!(api.url("/items"), "http://localhost:8000/items");
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let api = HttpApi::new("http://localhost:8000");
        api.set_token(Some("abc".into()));
        assert_eq!(api.token.read().unwrap().as_deref(), Some("abc"));
        api.set_token(None);
        assert!(api.token.read().unwrap().is_none());
    }
}
