//! Filter and pagination controller for the marketplace listing.
//!
//! [`FilterState`] is the single source of truth for what the listing shows.
//! Setters store their value verbatim; bound sanitizing happens when the state
//! is turned into a request (see [`crate::api::ListingQuery`]).
//!
//! Every setter except [`FilterState::set_page`] returns the view to page 1,
//! since a changed filter invalidates the current page.

use rust_decimal::Decimal;

use crate::domain::{SortKey, ALL_CATEGORIES};

/// Default upper price bound shown when the marketplace mounts.
pub const DEFAULT_MAX_PRICE: u32 = 100;

/// Search text, price range, sort order, category and page of the listing.
///
/// Price bounds are `None` when the user cleared the field or typed something
/// that does not parse as a number.
///
/// # Example
///
/// ```
/// use dexy::app::FilterState;
///
/// let mut filter = FilterState::default();
/// filter.set_page(3);
/// filter.set_search("doge");
/// assert_eq!(filter.page(), 1);
/// assert_eq!(filter.search_text(), "doge");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search_text: String,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    sort_key: SortKey,
    category: String,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            min_price: Some(Decimal::ZERO),
            max_price: Some(Decimal::from(DEFAULT_MAX_PRICE)),
            sort_key: SortKey::default(),
            category: ALL_CATEGORIES.to_string(),
            page: 1,
        }
    }
}

impl FilterState {
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    pub fn set_min_price(&mut self, price: Option<Decimal>) {
        self.min_price = price;
        self.page = 1;
    }

    pub fn set_max_price(&mut self, price: Option<Decimal>) {
        self.max_price = price;
        self.page = 1;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.page = 1;
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.page = 1;
    }

    /// Moves to `page`, leaving every other field alone.
    ///
    /// Pages are 1-based; `0` is stored as `1`.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub const fn min_price(&self) -> Option<Decimal> {
        self.min_price
    }

    #[must_use]
    pub const fn max_price(&self) -> Option<Decimal> {
        self.max_price
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: u32) -> FilterState {
        let mut filter = FilterState::default();
        filter.set_page(page);
        filter
    }

    #[test]
    fn defaults_match_marketplace_mount() {
        let filter = FilterState::default();
        assert_eq!(filter.search_text(), "");
        assert_eq!(filter.min_price(), Some(Decimal::ZERO));
        assert_eq!(filter.max_price(), Some(Decimal::from(100)));
        assert_eq!(filter.sort_key(), SortKey::Newest);
        assert_eq!(filter.category(), "All");
        assert_eq!(filter.page(), 1);
    }

    #[test]
    fn every_filter_setter_resets_page() {
        let setters: [fn(&mut FilterState); 5] = [
            |f| f.set_search("doge"),
            |f| f.set_min_price(Some(Decimal::from(-5))),
            |f| f.set_max_price(None),
            |f| f.set_sort_key(SortKey::PriceHighToLow),
            |f| f.set_category("Art"),
        ];

        for set in setters {
            let mut filter = on_page(5);
            set(&mut filter);
            assert_eq!(filter.page(), 1);
        }
    }

    #[test]
    fn interleaved_setters_and_page_changes_keep_page_consistent() {
        let setters: [fn(&mut FilterState); 5] = [
            |f| f.set_search("doge"),
            |f| f.set_min_price(Some(Decimal::from(2))),
            |f| f.set_max_price(Some(Decimal::from(7))),
            |f| f.set_sort_key(SortKey::Oldest),
            |f| f.set_category("Music"),
        ];

        let mut filter = FilterState::default();
        let mut seed: u32 = 7;
        for step in 0..200u32 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let pick = (seed >> 16) as usize % (setters.len() + 1);
            if pick == setters.len() {
                let page = step % 9 + 1;
                let before = filter.clone();
                filter.set_page(page);
                assert_eq!(filter.page(), page);
                assert_eq!(filter.search_text(), before.search_text());
                assert_eq!(filter.category(), before.category());
                assert_eq!(filter.sort_key(), before.sort_key());
            } else {
                setters[pick](&mut filter);
                assert_eq!(filter.page(), 1, "step {step}, setter {pick}");
            }
        }
    }

    #[test]
    fn search_on_page_three_goes_back_to_first_page() {
        let mut filter = on_page(3);
        filter.set_search("doge");
        assert_eq!(filter.search_text(), "doge");
        assert_eq!(filter.page(), 1);
    }

    #[test]
    fn set_page_only_touches_page() {
        let mut filter = FilterState::default();
        filter.set_search("cat");
        filter.set_category("Art");
        let before = filter.clone();

        filter.set_page(4);

        assert_eq!(filter.page(), 4);
        assert_eq!(filter.search_text(), before.search_text());
        assert_eq!(filter.category(), before.category());
        assert_eq!(filter.min_price(), before.min_price());
        assert_eq!(filter.max_price(), before.max_price());
        assert_eq!(filter.sort_key(), before.sort_key());
    }

    #[test]
    fn page_zero_is_clamped() {
        assert_eq!(on_page(0).page(), 1);
    }
}
