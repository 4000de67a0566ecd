//! Listing request descriptor.
//!
//! [`ListingQuery`] is the sanitized form of a [`FilterState`]: the filter
//! accepts anything the user types, the query is what the server receives.

use rust_decimal::Decimal;

use crate::app::FilterState;
use crate::domain::{Categories, SortKey};

/// Upper price bound sent when the user left the maximum empty or non-positive.
pub const UNBOUNDED_MAX_PRICE: u32 = 9999;

/// Query parameters of `GET /items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search_input: Option<String>,
    pub limit: u32,
    pub page: u32,
    pub price_start: Decimal,
    pub price_end: Decimal,
    pub sort_by: SortKey,
    pub category_id: Option<u64>,
}

impl ListingQuery {
    /// Builds the query for `filter`, with `limit` items per page.
    ///
    /// Bounds are sanitized: a missing or negative minimum becomes 0, a
    /// missing or non-positive maximum becomes [`UNBOUNDED_MAX_PRICE`], and
    /// inverted bounds are swapped. Blank search text and unknown categories
    /// are left out.
    ///
    /// # Example
    ///
    /// ```
    /// use dexy::api::ListingQuery;
    /// use dexy::app::FilterState;
    /// use dexy::domain::Categories;
    /// use rust_decimal::Decimal;
    ///
    /// let mut filter = FilterState::default();
    /// filter.set_min_price(Some(Decimal::from(50)));
    /// filter.set_max_price(Some(Decimal::from(10)));
    ///
    /// let query = ListingQuery::from_filter(&filter, &Categories::default(), 4);
    /// assert_eq!(query.price_start, Decimal::from(10));
    /// assert_eq!(query.price_end, Decimal::from(50));
    /// ```
    #[must_use]
    pub fn from_filter(filter: &FilterState, categories: &Categories, limit: u32) -> Self {
        let min = filter
            .min_price()
            .filter(|price| !price.is_sign_negative())
            .unwrap_or(Decimal::ZERO);
        let max = filter
            .max_price()
            .filter(|price| *price > Decimal::ZERO)
            .unwrap_or_else(|| Decimal::from(UNBOUNDED_MAX_PRICE));
        let (price_start, price_end) = if max < min { (max, min) } else { (min, max) };

        let search = filter.search_text().trim();

        Self {
            search_input: (!search.is_empty()).then(|| search.to_string()),
            limit: limit.max(1),
            page: filter.page(),
            price_start,
            price_end,
            sort_by: filter.sort_key(),
            category_id: categories.id_of(filter.category()),
        }
    }

    /// Flattens the query into URL parameters, in a stable order.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(7);
        if let Some(search) = &self.search_input {
            params.push(("search_input", search.clone()));
        }
        params.push(("limit", self.limit.to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("price_start", self.price_start.normalize().to_string()));
        params.push(("price_end", self.price_end.normalize().to_string()));
        params.push(("sort_by", self.sort_by.label().to_string()));
        if let Some(category_id) = self.category_id {
            params.push(("category_id", category_id.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn query(filter: &FilterState) -> ListingQuery {
        let categories = Categories::new(vec![
            Category { id: 1, name: "All".into() },
            Category { id: 4, name: "Art".into() },
        ]);
        ListingQuery::from_filter(filter, &categories, 4)
    }

    #[test]
    fn defaults_produce_first_page() {
        let q = query(&FilterState::default());
        assert_eq!(q.search_input, None);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 4);
        assert_eq!(q.price_start, Decimal::ZERO);
        assert_eq!(q.price_end, Decimal::from(100));
        assert_eq!(q.category_id, Some(1));
    }

    #[test]
    fn malformed_bounds_are_sanitized() {
        let mut filter = FilterState::default();
        filter.set_min_price(Some(Decimal::from(-3)));
        filter.set_max_price(Some(Decimal::ZERO));
        let q = query(&filter);
        assert_eq!(q.price_start, Decimal::ZERO);
        assert_eq!(q.price_end, Decimal::from(9999));

        filter.set_min_price(None);
        filter.set_max_price(None);
        let q = query(&filter);
        assert_eq!(q.price_start, Decimal::ZERO);
        assert_eq!(q.price_end, Decimal::from(9999));
    }

    #[test]
    fn blank_search_and_unknown_category_are_omitted() {
        let mut filter = FilterState::default();
        filter.set_search("   ");
        filter.set_category("Music");
        let params = query(&filter).params();
        assert!(params.iter().all(|(key, _)| *key != "search_input"));
        assert!(params.iter().all(|(key, _)| *key != "category_id"));
    }

    #[test]
    fn params_carry_every_field() {
        let mut filter = FilterState::default();
        filter.set_search("doge");
        filter.set_sort_key(SortKey::PriceLowToHigh);
        filter.set_category("art");
        filter.set_page(2);

        let params = query(&filter).params();
        assert_eq!(
            params,
            vec![
                ("search_input", "doge".to_string()),
                ("limit", "4".to_string()),
                ("page", "2".to_string()),
                ("price_start", "0".to_string()),
                ("price_end", "100".to_string()),
                ("sort_by", "Price (Lowest to highest)".to_string()),
                ("category_id", "4".to_string()),
            ]
        );
    }
}
