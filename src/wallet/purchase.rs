//! Batch purchase construction.
//!
//! Checkout buys every cart line in one `batchBuy(owners, ids, prices)` call
//! whose attached value is the sum of the prices. Prices travel in wei, so the
//! ether decimals of the catalog are scaled by 10^18 exactly.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Address, CartItem, DexyError, ItemId, Result};

const WEI_DECIMALS: u32 = 18;

/// Arguments of one `batchBuy` contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchPurchase {
    pub owners: Vec<Address>,
    pub item_ids: Vec<ItemId>,
    /// Prices in wei, as decimal strings.
    #[serde(serialize_with = "serialize_wei")]
    pub prices_wei: Vec<u128>,
    #[serde(serialize_with = "serialize_wei_total")]
    pub value_wei: u128,
}

impl BatchPurchase {
    /// Builds the call for `lines`.
    ///
    /// # Errors
    ///
    /// Returns [`DexyError::Validation`] if a price is negative, has more than
    /// 18 decimal places, or the total overflows.
    pub fn from_cart(lines: &[CartItem]) -> Result<Self> {
        let mut owners = Vec::with_capacity(lines.len());
        let mut item_ids = Vec::with_capacity(lines.len());
        let mut prices_wei = Vec::with_capacity(lines.len());
        let mut value_wei: u128 = 0;

        for line in lines {
            let wei = parse_ether(line.unit_price)?;
            value_wei = value_wei
                .checked_add(wei)
                .ok_or_else(|| DexyError::Validation("Order total is too large".to_string()))?;
            owners.push(line.owner_address.clone());
            item_ids.push(line.item_id);
            prices_wei.push(wei);
        }

        Ok(Self {
            owners,
            item_ids,
            prices_wei,
            value_wei,
        })
    }
}

/// Converts an ether amount to wei without rounding.
///
/// # Errors
///
/// Returns [`DexyError::Validation`] for negative amounts and amounts with
/// sub-wei precision.
///
/// # Example
///
/// ```
/// use dexy::wallet::parse_ether;
/// use rust_decimal::Decimal;
///
/// let wei = parse_ether("0.5".parse::<Decimal>().unwrap()).unwrap();
/// assert_eq!(wei, 500_000_000_000_000_000);
/// ```
pub fn parse_ether(amount: Decimal) -> Result<u128> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DexyError::Validation(format!("Invalid price: {amount}")));
    }

    let amount = amount.normalize();
    let scale = amount.scale();
    if scale > WEI_DECIMALS {
        return Err(DexyError::Validation(format!(
            "Price {amount} has more than {WEI_DECIMALS} decimal places"
        )));
    }

    let mantissa = u128::try_from(amount.mantissa())
        .map_err(|_| DexyError::Validation(format!("Invalid price: {amount}")))?;

    10u128
        .checked_pow(WEI_DECIMALS - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| DexyError::Validation(format!("Price {amount} is too large")))
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_wei_total<S: serde::Serializer>(value: &u128, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

#[allow(clippy::ptr_arg)]
fn serialize_wei<S: serde::Serializer>(values: &Vec<u128>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(&value.to_string())?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(id: u64, price: &str) -> CartItem {
        CartItem {
            item_id: ItemId(id),
            owner_address: Address::parse("0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d").unwrap(),
            display_name: String::new(),
            image_ref: String::new(),
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn ether_to_wei_is_exact() {
        assert_eq!(parse_ether(Decimal::from_str("1").unwrap()).unwrap(), 10u128.pow(18));
        assert_eq!(parse_ether(Decimal::from_str("0.001").unwrap()).unwrap(), 10u128.pow(15));
        assert_eq!(parse_ether(Decimal::from_str("1.50").unwrap()).unwrap(), 15 * 10u128.pow(17));
        assert_eq!(parse_ether(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn sub_wei_and_negative_prices_are_rejected() {
        assert!(parse_ether(Decimal::from_str("0.0000000000000000001").unwrap()).is_err());
        assert!(parse_ether(Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn batch_value_is_sum_of_prices() {
        let purchase = BatchPurchase::from_cart(&[line(1, "0.1"), line(2, "0.25")]).unwrap();
        assert_eq!(purchase.item_ids, vec![ItemId(1), ItemId(2)]);
        assert_eq!(purchase.prices_wei, vec![10u128.pow(17), 25 * 10u128.pow(16)]);
        assert_eq!(purchase.value_wei, 35 * 10u128.pow(16));
    }

    #[test]
    fn wei_amounts_serialize_as_strings() {
        let purchase = BatchPurchase::from_cart(&[line(3, "2")]).unwrap();
        let json = serde_json::to_value(&purchase).unwrap();
        assert_eq!(json["prices_wei"][0], "2000000000000000000");
        assert_eq!(json["value_wei"], "2000000000000000000");
        assert_eq!(json["item_ids"][0], 3);
    }
}
