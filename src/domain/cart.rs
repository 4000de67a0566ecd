//! Cart lines and price arithmetic.

use rust_decimal::Decimal;

use super::item::{Address, Item, ItemId};

/// One line of the shopping cart.
///
/// The cart lives server-side per wallet; these lines are the locally cached
/// projection that optimistic mutations operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub item_id: ItemId,
    pub owner_address: Address,
    pub display_name: String,
    pub image_ref: String,
    pub unit_price: Decimal,
}

impl From<Item> for CartItem {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.id,
            owner_address: item.owner,
            display_name: item.name,
            image_ref: item.image,
            unit_price: item.price,
        }
    }
}

/// Exact sum of the unit prices of `items`.
///
/// ```
/// use dexy::domain::total_price;
///
/// assert_eq!(total_price(&[]), rust_decimal::Decimal::ZERO);
/// ```
#[must_use]
pub fn total_price(items: &[CartItem]) -> Decimal {
    items.iter().map(|item| item.unit_price).sum()
}

/// Total as displayed: rounded to three decimal places, trailing zeros dropped.
#[must_use]
pub fn display_total(items: &[CartItem]) -> Decimal {
    total_price(items).round_dp(3).normalize()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(id: u64, price: &str) -> CartItem {
        CartItem {
            item_id: ItemId(id),
            owner_address: Address::parse("0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d").unwrap(),
            display_name: format!("item {id}"),
            image_ref: String::new(),
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn total_is_exact() {
        let items = [line(1, "0.1"), line(2, "0.2")];
        assert_eq!(total_price(&items), Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn display_total_rounds_to_three_places() {
        let items = [line(1, "0.12345"), line(2, "1")];
        assert_eq!(display_total(&items).to_string(), "1.123");
    }
}
