//! Sort orders and the category directory used by the listing filter.

use serde::{Deserialize, Serialize};

use super::error::{DexyError, Result};

/// Name of the pseudo-category that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceLowToHigh,
    PriceHighToLow,
}

impl SortKey {
    pub const ALL: [Self; 4] = [
        Self::Newest,
        Self::Oldest,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
    ];

    /// Label sent as `sort_by` and shown in the filter bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::PriceLowToHigh => "Price (Lowest to highest)",
            Self::PriceHighToLow => "Price (Highest to lowest)",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = DexyError;

    /// Accepts the display labels as well as short CLI spellings.
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        match needle.as_str() {
            "newest" | "new" | "recent" | "recently listed" => Ok(Self::Newest),
            "oldest" | "old" => Ok(Self::Oldest),
            "price-asc" | "asc" | "price (lowest to highest)" => Ok(Self::PriceLowToHigh),
            "price-desc" | "desc" | "price (highest to lowest)" => Ok(Self::PriceHighToLow),
            _ => Err(DexyError::Validation(format!("Unknown sort order: {s}"))),
        }
    }
}

/// A marketplace category as served by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category_id")]
    pub id: u64,
    #[serde(rename = "category_name")]
    pub name: String,
}

/// Known categories, loaded once at start.
///
/// The filter tracks categories by name; the directory resolves a name to the
/// id the listing endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    entries: Vec<Category>,
}

impl Categories {
    #[must_use]
    pub fn new(entries: Vec<Category>) -> Self {
        Self { entries }
    }

    /// Id for `name`, or `None` when the name is unknown.
    ///
    /// Lookup ignores ASCII case.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_labels_and_aliases() {
        for key in SortKey::ALL {
            assert_eq!(key.label().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("price-desc".parse::<SortKey>().unwrap(), SortKey::PriceHighToLow);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn category_lookup_is_case_insensitive() {
        let categories = Categories::new(vec![
            Category { id: 1, name: "All".into() },
            Category { id: 7, name: "Art".into() },
        ]);
        assert_eq!(categories.id_of("art"), Some(7));
        assert_eq!(categories.id_of("Music"), None);
        assert_eq!(categories.names().collect::<Vec<_>>(), vec!["All", "Art"]);
    }

    #[test]
    fn category_uses_wire_field_names() {
        let parsed: Category =
            serde_json::from_str(r#"{"category_id": 3, "category_name": "Gaming"}"#).unwrap();
        assert_eq!(parsed, Category { id: 3, name: "Gaming".into() });
    }
}
