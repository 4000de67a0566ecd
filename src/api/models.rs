//! Wire records of the marketplace REST API and their conversion into domain types.
//!
//! The API is loosely typed: ids arrive as numbers or strings, prices as numbers
//! or decimal strings, optional fields are sometimes missing and sometimes null.
//! Records here absorb that looseness so the domain types do not have to.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Address, CartItem, Item, ItemId, Offer, Transaction, UserProfile};

/// One page of a paginated endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Converts every entry, keeping the page count.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }
}

/// `{ "data": T }`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// `{ "data": [T], "total_pages": n }`
#[derive(Debug, Deserialize)]
pub(crate) struct PageEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

const fn first_page() -> u32 {
    1
}

impl<T> From<PageEnvelope<T>> for Page<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        Self {
            items: envelope.data,
            total_pages: envelope.total_pages.max(1),
        }
    }
}

/// Error body: `{ "detail": ... }`. Validation errors carry a list instead of a string.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) => Some(text.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
}

/// Ids are numeric, but some endpoints serialize them as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    fn into_id(self) -> ItemId {
        match self {
            Self::Number(id) => ItemId(id),
            Self::Text(text) => text.trim().parse().unwrap_or(ItemId(0)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ItemRecord {
    pub item_id: WireId,
    pub item_name: String,
    #[serde(default)]
    pub item_image: Option<String>,
    pub item_fixed_price: Decimal,
    pub item_owner_address: Address,
    #[serde(default)]
    pub item_description: Option<String>,
    #[serde(default)]
    pub item_start_price: Option<Decimal>,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.item_id.into_id(),
            name: record.item_name,
            image: record.item_image.unwrap_or_default(),
            price: record.item_fixed_price,
            owner: record.item_owner_address,
            description: record.item_description,
            start_price: record.item_start_price,
        }
    }
}

impl From<ItemRecord> for CartItem {
    fn from(record: ItemRecord) -> Self {
        Item::from(record).into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OfferRecord {
    pub offer_price: Decimal,
    #[serde(default)]
    pub offer_date: Option<String>,
    pub offer_from_user_address: Address,
}

impl From<OfferRecord> for Offer {
    fn from(record: OfferRecord) -> Self {
        Self {
            price: record.offer_price,
            date: record.offer_date.unwrap_or_default(),
            from: record.offer_from_user_address,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserRecord {
    #[serde(alias = "address")]
    pub user_address: Address,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            address: record.user_address,
            username: record.username,
            email: record.email,
            avatar: record.avatar,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransactionRecord {
    pub event: String,
    #[serde(alias = "item")]
    pub item_name: String,
    pub price: Decimal,
    #[serde(default, alias = "from")]
    pub from_address: Option<Address>,
    #[serde(default, alias = "to")]
    pub to_address: Option<Address>,
    #[serde(default)]
    pub date: Option<String>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Self {
            event: record.event,
            item_name: record.item_name,
            price: record.price,
            from: record.from_address,
            to: record.to_address,
            date: record.date.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d";

    #[test]
    fn item_page_decodes_loose_ids_and_prices() {
        let body = format!(
            r#"{{
                "data": [
                    {{"item_id": 7, "item_name": "Doge", "item_image": null,
                      "item_fixed_price": "0.25", "item_owner_address": "{OWNER}"}},
                    {{"item_id": "8", "item_name": "Cat", "item_image": "aGk=",
                      "item_fixed_price": 2, "item_owner_address": "{OWNER}"}}
                ],
                "total_pages": 3
            }}"#
        );

        let envelope: PageEnvelope<ItemRecord> = serde_json::from_str(&body).unwrap();
        let page: Page<Item> = Page::from(envelope).map(Item::from);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].id, ItemId(7));
        assert_eq!(page.items[0].price, "0.25".parse::<Decimal>().unwrap());
        assert_eq!(page.items[0].image, "");
        assert_eq!(page.items[1].id, ItemId(8));
        assert_eq!(page.items[1].price, Decimal::from(2));
    }

    #[test]
    fn missing_total_pages_means_one_page() {
        let envelope: PageEnvelope<OfferRecord> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(Page::from(envelope).total_pages, 1);
    }

    #[test]
    fn error_detail_only_surfaces_strings() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Item not found"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("Item not found"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body"], "msg": "bad"}]}"#).unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn user_record_accepts_either_address_key() {
        let record: UserRecord =
            serde_json::from_str(&format!(r#"{{"address": "{OWNER}", "username": "ana"}}"#)).unwrap();
        let profile = UserProfile::from(record);
        assert_eq!(profile.username.as_deref(), Some("ana"));
        assert_eq!(profile.email, None);
    }
}
