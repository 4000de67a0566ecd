//! Optimistic cart mutation coordinator.
//!
//! Cart mutations are applied to the local projection first and confirmed or
//! rolled back when the server answers:
//!
//! ```text
//!            begin_*()                  commit()
//!   Idle ───────────────▶ Applied ────────────────▶ Idle (+ success notice)
//!                            │
//!                            │ rollback()
//!                            ▼
//!                   snapshot restored ─────────────▶ Idle (+ error notice)
//! ```
//!
//! At most one mutation is in flight. While one is, every other mutation and
//! checkout is refused. A mutation remembers the fetch its lines came from; if
//! the cart was closed or refetched meanwhile, the rollback leaves the newer
//! projection alone.

use crate::domain::{display_total, total_price, CartItem, DexyError, ItemId, Result};
use rust_decimal::Decimal;

/// The mutation currently applied locally but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingMutation {
    /// A line appended at `index`.
    Add { item_id: ItemId, index: usize },
    /// A line spliced out of `index`.
    Remove { item: CartItem, index: usize },
    /// The whole cart, as it was before it was emptied.
    Clear { snapshot: Vec<CartItem> },
    /// A batch purchase of the listed items.
    Checkout { purchased: Vec<ItemId> },
}

/// Local view of the wallet's shopping cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    pub open: bool,
    pub loading: bool,
    items: Vec<CartItem>,
    fetch_seq: u64,
    last_mutation_id: u64,
    /// Mutation id, fetch sequence it was applied to, and the mutation.
    pending: Option<(u64, u64, PendingMutation)>,
}

impl CartState {
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        total_price(&self.items)
    }

    #[must_use]
    pub fn display_total(&self) -> Decimal {
        display_total(&self.items)
    }

    #[must_use]
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.items.iter().any(|line| line.item_id == item_id)
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingMutation> {
        self.pending.as_ref().map(|(_, _, mutation)| mutation)
    }

    /// A cart line mutation (add, remove, clear) is in flight.
    #[must_use]
    pub fn mutation_loading(&self) -> bool {
        matches!(
            self.pending(),
            Some(PendingMutation::Add { .. } | PendingMutation::Remove { .. } | PendingMutation::Clear { .. })
        )
    }

    /// A checkout is in flight.
    #[must_use]
    pub fn submitting(&self) -> bool {
        matches!(self.pending(), Some(PendingMutation::Checkout { .. }))
    }

    /// Whether remove, clear and checkout controls should be enabled.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        self.pending.is_none() && !self.loading
    }

    /// Opens the cart and returns the sequence number of the fetch to issue.
    pub fn open(&mut self) -> u64 {
        self.open = true;
        self.loading = true;
        self.items.clear();
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Closes the cart and drops the cached lines.
    ///
    /// An in-flight mutation keeps the controls gated until it settles.
    pub fn close(&mut self) {
        self.open = false;
        self.loading = false;
        self.items.clear();
        self.fetch_seq += 1;
    }

    /// Installs fetched lines. Returns `false` for a superseded fetch.
    pub fn loaded(&mut self, seq: u64, items: Vec<CartItem>) -> bool {
        if seq != self.fetch_seq || !self.open {
            return false;
        }
        self.items = items;
        self.loading = false;
        true
    }

    /// Marks a fetch as failed. Returns `false` for a superseded fetch.
    pub fn load_failed(&mut self, seq: u64) -> bool {
        if seq != self.fetch_seq || !self.open {
            return false;
        }
        self.loading = false;
        true
    }

    /// Appends `item` and returns the mutation id to confirm it with.
    ///
    /// # Errors
    ///
    /// Fails if another mutation is in flight or the item is already in the cart.
    pub fn begin_add(&mut self, item: CartItem) -> Result<u64> {
        self.ensure_idle()?;
        if self.contains(item.item_id) {
            return Err(DexyError::Validation("Item is already in your cart".to_string()));
        }
        let index = self.items.len();
        let item_id = item.item_id;
        self.items.push(item);
        Ok(self.start(PendingMutation::Add { item_id, index }))
    }

    /// Splices `item_id` out of the cart.
    ///
    /// # Errors
    ///
    /// Fails if another mutation is in flight or the item is not in the cart.
    pub fn begin_remove(&mut self, item_id: ItemId) -> Result<(u64, CartItem)> {
        self.ensure_idle()?;
        let index = self
            .items
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or_else(|| DexyError::Validation(format!("Item {item_id} is not in your cart")))?;
        let item = self.items.remove(index);
        let id = self.start(PendingMutation::Remove {
            item: item.clone(),
            index,
        });
        Ok((id, item))
    }

    /// Empties the cart, returning the ids that must be deleted server-side.
    ///
    /// # Errors
    ///
    /// Fails if another mutation is in flight or the cart is already empty.
    pub fn begin_clear(&mut self) -> Result<(u64, Vec<ItemId>)> {
        self.ensure_idle()?;
        if self.items.is_empty() {
            return Err(DexyError::Validation("Your cart is empty".to_string()));
        }
        let snapshot = std::mem::take(&mut self.items);
        let ids = snapshot.iter().map(|line| line.item_id).collect();
        Ok((self.start(PendingMutation::Clear { snapshot }), ids))
    }

    /// Starts a checkout of every line. The lines stay visible until it settles.
    ///
    /// # Errors
    ///
    /// Fails without a connected wallet, with an empty cart, or while another
    /// mutation is in flight.
    pub fn begin_checkout(&mut self, wallet_connected: bool) -> Result<(u64, Vec<CartItem>)> {
        if !wallet_connected {
            return Err(DexyError::Validation(
                "Connect your wallet to place an order".to_string(),
            ));
        }
        self.ensure_idle()?;
        if self.loading {
            return Err(DexyError::Validation("Cart is still loading".to_string()));
        }
        if self.items.is_empty() {
            return Err(DexyError::Validation("Your cart is empty".to_string()));
        }
        let lines = self.items.clone();
        let purchased = lines.iter().map(|line| line.item_id).collect();
        Ok((self.start(PendingMutation::Checkout { purchased }), lines))
    }

    /// Confirms mutation `id`. A confirmed checkout closes and clears the cart.
    ///
    /// Returns the confirmed mutation, or `None` if `id` is not the pending one.
    pub fn commit(&mut self, id: u64) -> Option<PendingMutation> {
        let (_, mutation) = self.take(id)?;
        if matches!(mutation, PendingMutation::Checkout { .. }) {
            self.close();
        }
        Some(mutation)
    }

    /// Reverts mutation `id` to the exact pre-mutation state.
    ///
    /// Lines fetched after the mutation started are already the server's truth
    /// and are kept as they are. A closed cart is refetched on the next open.
    pub fn rollback(&mut self, id: u64) -> Option<PendingMutation> {
        let (applied_to, mutation) = self.take(id)?;
        if !self.open || applied_to != self.fetch_seq {
            tracing::debug!(mutation_id = id, "cart refetched since mutation, skipping rollback");
            return Some(mutation);
        }
        match &mutation {
            PendingMutation::Add { item_id, index } => {
                if self.items.get(*index).is_some_and(|line| line.item_id == *item_id) {
                    self.items.remove(*index);
                } else {
                    self.items.retain(|line| line.item_id != *item_id);
                }
            }
            PendingMutation::Remove { item, index } => {
                let at = (*index).min(self.items.len());
                self.items.insert(at, item.clone());
            }
            PendingMutation::Clear { snapshot } => {
                self.items.clone_from(snapshot);
            }
            PendingMutation::Checkout { .. } => {}
        }
        Some(mutation)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.pending.is_some() {
            return Err(DexyError::Validation(
                "Another cart update is in progress".to_string(),
            ));
        }
        Ok(())
    }

    fn start(&mut self, mutation: PendingMutation) -> u64 {
        self.last_mutation_id += 1;
        tracing::debug!(mutation_id = self.last_mutation_id, mutation = ?mutation, "cart mutation applied");
        self.pending = Some((self.last_mutation_id, self.fetch_seq, mutation));
        self.last_mutation_id
    }

    fn take(&mut self, id: u64) -> Option<(u64, PendingMutation)> {
        match &self.pending {
            Some((pending_id, _, _)) if *pending_id == id => {
                self.pending.take().map(|(_, fetch_seq, m)| (fetch_seq, m))
            }
            _ => {
                tracing::debug!(mutation_id = id, "ignoring settlement of unknown cart mutation");
                None
            }
        }
    }
}
