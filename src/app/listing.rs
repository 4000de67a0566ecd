//! Marketplace listing results and request sequencing.
//!
//! Every listing request is tagged with a monotonically increasing sequence
//! number. Only the response carrying the latest issued number is applied;
//! anything older lost the race and is dropped. Debounce timers reuse the same
//! counter, so a timer armed before a newer filter change is ignored when it
//! fires.

use crate::domain::{Item, ItemId};

/// Results of the most recent listing fetch plus the request bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    latest_seq: u64,
    pub items: Vec<Item>,
    pub total_pages: u32,
    pub loading: bool,
    /// Inline error of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
}

impl ListingState {
    /// Issues a new sequence number, invalidating every earlier one.
    pub fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    #[must_use]
    pub const fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    /// Applies a successful response. Returns `false` if `seq` is stale.
    pub fn apply(&mut self, seq: u64, items: Vec<Item>, total_pages: u32) -> bool {
        if !self.is_current(seq) {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale listing response");
            return false;
        }
        self.items = items;
        self.total_pages = total_pages;
        self.loading = false;
        self.error = None;
        true
    }

    /// Records a failed fetch, keeping the previous results on screen.
    ///
    /// Returns `false` if `seq` is stale.
    pub fn fail(&mut self, seq: u64, message: String) -> bool {
        if !self.is_current(seq) {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale listing failure");
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    /// Whether any displayed item is among `ids`.
    #[must_use]
    pub fn shows_any(&self, ids: &[ItemId]) -> bool {
        self.items.iter().any(|item| ids.contains(&item.id))
    }
}
