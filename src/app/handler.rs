//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place state changes. It pattern-matches the
//! event, mutates [`AppState`] through its controllers and returns whether the
//! view must be re-rendered together with the side effects to run.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Init`, `Navigate`, `Refresh`
//! - **Filter**: `SetSearch` (debounced), `SetMinPrice`, `SetMaxPrice`,
//!   `SetSortKey`, `SetCategory`, `SetPage`, `DebounceElapsed`
//! - **Cart**: `OpenCart`, `CloseCart`, `AddToCart`, `RemoveFromCart`,
//!   `ClearCart`, `Checkout`
//! - **Session**: `ConnectWallet`, `Logout`
//! - **Detail views**: `SetOfferPage`, `PlaceOffer`, `UpdateProfile`, `CreateItem`
//! - **Notifications**: `DismissNotification`, `NotificationExpired`
//! - **Worker**: `WorkerResponse` with typed response variants
//!
//! # Example
//!
//! ```rust
//! use dexy::app::{handle_event, AppState, Event};
//! use dexy::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::SetPage(2))?;
//! assert!(should_render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), dexy::domain::DexyError>(())
//! ```

use chrono::Utc;
use rust_decimal::Decimal;

use crate::app::cart::PendingMutation;
use crate::app::modes::Route;
use crate::app::session::LoginPhase;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{
    CartItem, DexyError, ItemId, NewItem, NotificationLevel, OfferDraft, ProfileUpdate, SortKey,
};
use crate::wallet::BatchPurchase;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, timers or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Storefront mounted: load categories, restore the session, fetch the view.
    Init,
    Navigate(Route),
    /// Refetch the active view.
    Refresh,

    SetSearch(String),
    SetMinPrice(Option<Decimal>),
    SetMaxPrice(Option<Decimal>),
    SetSortKey(SortKey),
    SetCategory(String),
    SetPage(u32),
    /// The search debounce armed with `seq` ran out.
    DebounceElapsed { seq: u64 },

    OpenCart,
    CloseCart,
    AddToCart(ItemId),
    RemoveFromCart(ItemId),
    ClearCart,
    Checkout,

    ConnectWallet,
    Logout,

    SetOfferPage(u32),
    PlaceOffer { price: Decimal, accept_terms: bool },
    UpdateProfile(ProfileUpdate),
    CreateItem(NewItem),

    DismissNotification(u64),
    NotificationExpired(u64),

    WorkerResponse(WorkerResponse),
}

/// Notifies about a refused operation and renders.
fn refuse(state: &mut AppState, error: &DexyError, fallback: &str) -> (bool, Vec<Action>) {
    tracing::debug!(error = %error, "operation refused");
    let action = state.notify(NotificationLevel::Error, error.user_message(fallback));
    (true, vec![action])
}

fn require_wallet(state: &AppState, what: &str) -> Result<()> {
    if state.session.is_connected() {
        Ok(())
    } else {
        Err(DexyError::Validation(format!("Connect your wallet to {what}")))
    }
}

/// Finds an item shown anywhere, to turn it into a cart line.
fn find_shown_item(state: &AppState, item_id: ItemId) -> Option<CartItem> {
    state
        .listing
        .items
        .iter()
        .chain(state.item_view.item.iter())
        .chain(state.account_view.items.iter())
        .find(|item| item.id == item_id)
        .cloned()
        .map(CartItem::from)
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// `(should_render, actions)`: whether the view changed, and the side effects
/// to run in order.
///
/// # Errors
///
/// Reserved for internal invariant failures; user-facing failures become
/// notifications instead.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Init => {
            let mut actions = vec![
                Action::PostToWorker(WorkerMessage::LoadCategories),
                Action::PostToWorker(WorkerMessage::RestoreSession),
            ];
            actions.extend(state.fetch_active_view());
            Ok((true, actions))
        }
        Event::Navigate(route) => Ok((true, state.navigate(route.clone()))),
        Event::Refresh => Ok((true, state.fetch_active_view())),

        Event::SetSearch(text) => {
            state.filter.set_search(text.clone());
            if state.route != Route::Marketplace {
                return Ok((false, vec![]));
            }
            Ok((true, vec![state.debounce_listing()]))
        }
        Event::SetMinPrice(price) => {
            state.filter.set_min_price(*price);
            filter_changed(state)
        }
        Event::SetMaxPrice(price) => {
            state.filter.set_max_price(*price);
            filter_changed(state)
        }
        Event::SetSortKey(key) => {
            state.filter.set_sort_key(*key);
            filter_changed(state)
        }
        Event::SetCategory(category) => {
            state.filter.set_category(category.clone());
            filter_changed(state)
        }
        Event::SetPage(page) => {
            state.filter.set_page(*page);
            filter_changed(state)
        }
        Event::DebounceElapsed { seq } => {
            if state.route != Route::Marketplace {
                return Ok((false, vec![]));
            }
            Ok(state
                .fetch_listing_if_current(*seq)
                .map_or((false, vec![]), |action| (true, vec![action])))
        }

        Event::OpenCart => {
            if let Err(e) = require_wallet(state, "view your cart") {
                return Ok(refuse(state, &e, "Failed to open cart"));
            }
            let seq = state.cart.open();
            Ok((true, vec![Action::PostToWorker(WorkerMessage::FetchCart { seq })]))
        }
        Event::CloseCart => {
            state.cart.close();
            Ok((true, vec![]))
        }
        Event::AddToCart(item_id) => {
            if let Err(e) = require_wallet(state, "use the cart") {
                return Ok(refuse(state, &e, "Failed to add item to cart"));
            }
            let Some(line) = find_shown_item(state, *item_id) else {
                let e = DexyError::Validation(format!("Item {item_id} is not shown"));
                return Ok(refuse(state, &e, "Failed to add item to cart"));
            };
            match state.cart.begin_add(line) {
                Ok(mutation_id) => Ok((
                    true,
                    vec![Action::PostToWorker(WorkerMessage::AddCartItem {
                        mutation_id,
                        item_id: *item_id,
                    })],
                )),
                Err(e) => Ok(refuse(state, &e, "Failed to add item to cart")),
            }
        }
        Event::RemoveFromCart(item_id) => match state.cart.begin_remove(*item_id) {
            Ok((mutation_id, _)) => Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::RemoveCartItem {
                    mutation_id,
                    item_id: *item_id,
                })],
            )),
            Err(e) => Ok(refuse(state, &e, "Failed to remove item")),
        },
        Event::ClearCart => match state.cart.begin_clear() {
            Ok((mutation_id, item_ids)) => Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::ClearCart {
                    mutation_id,
                    item_ids,
                })],
            )),
            Err(e) => Ok(refuse(state, &e, "Failed to remove items")),
        },
        Event::Checkout => {
            let connected = state.session.is_connected();
            let (mutation_id, lines) = match state.cart.begin_checkout(connected) {
                Ok(started) => started,
                Err(e) => return Ok(refuse(state, &e, "Failed to place order")),
            };
            match BatchPurchase::from_cart(&lines) {
                Ok(purchase) => Ok((
                    true,
                    vec![Action::PostToWorker(WorkerMessage::Checkout {
                        mutation_id,
                        purchase,
                    })],
                )),
                Err(e) => {
                    state.cart.rollback(mutation_id);
                    Ok(refuse(state, &e, "Failed to place order"))
                }
            }
        }

        Event::ConnectWallet => {
            if state.session.phase != LoginPhase::Disconnected {
                tracing::debug!(phase = ?state.session.phase, "wallet already connecting or connected");
                return Ok((false, vec![]));
            }
            state.session.begin_sign_in();
            Ok((true, vec![Action::PostToWorker(WorkerMessage::SignIn)]))
        }
        Event::Logout => {
            let address = state.session.address.clone();
            Ok((false, vec![Action::PostToWorker(WorkerMessage::SignOut { address })]))
        }

        Event::SetOfferPage(page) => {
            let Route::Item(item_id) = state.route else {
                return Ok((false, vec![]));
            };
            Ok((true, vec![state.fetch_offers(item_id, *page)]))
        }
        Event::PlaceOffer { price, accept_terms } => {
            let Route::Item(item_id) = state.route else {
                let e = DexyError::Validation("Open an item to place an offer".to_string());
                return Ok(refuse(state, &e, "Failed to place offer"));
            };
            let draft = OfferDraft {
                item_id,
                price: *price,
                accept_terms: *accept_terms,
            };
            let checked = require_wallet(state, "place an offer")
                .and_then(|()| draft.validate(state.session.balance));
            if let Err(e) = checked {
                return Ok(refuse(state, &e, "Failed to place offer"));
            }
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::PlaceOffer {
                    item_id,
                    price: draft.price,
                })],
            ))
        }
        Event::UpdateProfile(update) => {
            let checked = require_wallet(state, "edit your profile").and_then(|()| update.validate());
            let address = match (checked, state.session.address.clone()) {
                (Ok(()), Some(address)) => address,
                (Err(e), _) => return Ok(refuse(state, &e, "Failed to update profile")),
                (Ok(()), None) => return Ok((false, vec![])),
            };
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::UpdateProfile {
                    address,
                    update: update.clone(),
                })],
            ))
        }
        Event::CreateItem(draft) => {
            let checked = require_wallet(state, "create an item").and_then(|()| draft.validate());
            if let Err(e) = checked {
                return Ok(refuse(state, &e, "Failed to create item"));
            }
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::CreateItem {
                    draft: draft.clone(),
                })],
            ))
        }

        Event::DismissNotification(id) => Ok((state.dismiss(*id), vec![])),
        Event::NotificationExpired(id) => {
            let dismissed = state.dismiss(*id);
            let pruned = state.prune_notifications(Utc::now());
            Ok((dismissed || pruned, vec![]))
        }

        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

/// Refetches the listing after a non-search filter change.
fn filter_changed(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    if state.route != Route::Marketplace {
        return Ok((false, vec![]));
    }
    Ok((true, vec![state.fetch_listing()]))
}

#[allow(clippy::too_many_lines)]
fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::CategoriesLoaded { categories } => {
            let before = state.categories.id_of(state.filter.category());
            state.categories = crate::domain::Categories::new(categories.clone());
            let after = state.categories.id_of(state.filter.category());
            tracing::debug!(count = categories.len(), "categories loaded");

            // The listing may have gone out before the category id was known.
            if before != after && state.route == Route::Marketplace {
                return Ok((true, vec![state.fetch_listing()]));
            }
            Ok((true, vec![]))
        }

        WorkerResponse::ListingLoaded { seq, page } => {
            let applied = state
                .listing
                .apply(*seq, page.items.clone(), page.total_pages);
            Ok((applied, vec![]))
        }
        WorkerResponse::ListingFailed { seq, message } => {
            if !state.listing.fail(*seq, message.clone()) {
                return Ok((false, vec![]));
            }
            Ok((true, vec![state.notify(NotificationLevel::Error, message.clone())]))
        }

        WorkerResponse::ItemLoaded { seq, item, offers } => {
            if !state.is_current_view(*seq) || state.route != Route::Item(item.id) {
                tracing::debug!(seq, "discarding stale item response");
                return Ok((false, vec![]));
            }
            let view = &mut state.item_view;
            view.item = Some(item.clone());
            view.offers.clone_from(&offers.items);
            view.offer_total_pages = offers.total_pages;
            view.loading = false;
            view.error = None;
            Ok((true, vec![]))
        }
        WorkerResponse::OffersLoaded { seq, offers } => {
            if !state.is_current_view(*seq) {
                return Ok((false, vec![]));
            }
            state.item_view.offers.clone_from(&offers.items);
            state.item_view.offer_total_pages = offers.total_pages;
            Ok((true, vec![]))
        }
        WorkerResponse::AccountLoaded {
            seq,
            profile,
            items,
            transactions,
        } => {
            if !state.is_current_view(*seq) {
                tracing::debug!(seq, "discarding stale account response");
                return Ok((false, vec![]));
            }
            let view = &mut state.account_view;
            view.profile = Some(profile.clone());
            view.items.clone_from(items);
            view.transactions.clone_from(transactions);
            view.loading = false;
            view.error = None;
            Ok((true, vec![]))
        }
        WorkerResponse::ViewFailed { seq, message } => {
            if !state.is_current_view(*seq) {
                return Ok((false, vec![]));
            }
            match state.route {
                Route::Item(_) => {
                    state.item_view.loading = false;
                    state.item_view.error = Some(message.clone());
                }
                Route::Account(_) => {
                    state.account_view.loading = false;
                    state.account_view.error = Some(message.clone());
                }
                Route::Marketplace | Route::Create => {}
            }
            Ok((true, vec![state.notify(NotificationLevel::Error, message.clone())]))
        }

        WorkerResponse::CartLoaded { seq, items } => Ok((state.cart.loaded(*seq, items.clone()), vec![])),
        WorkerResponse::CartLoadFailed { seq, message } => {
            if !state.cart.load_failed(*seq) {
                return Ok((false, vec![]));
            }
            Ok((true, vec![state.notify(NotificationLevel::Error, message.clone())]))
        }

        WorkerResponse::CartMutationSettled {
            mutation_id,
            outcome: Ok(()),
        } => {
            let message = match state.cart.commit(*mutation_id) {
                Some(PendingMutation::Add { .. }) => "Item added to cart",
                Some(PendingMutation::Remove { .. }) => "Item removed successfully",
                Some(PendingMutation::Clear { .. }) => "All items removed successfully",
                Some(PendingMutation::Checkout { .. }) | None => return Ok((false, vec![])),
            };
            Ok((true, vec![state.notify(NotificationLevel::Success, message)]))
        }
        WorkerResponse::CartMutationSettled {
            mutation_id,
            outcome: Err(message),
        } => {
            if state.cart.rollback(*mutation_id).is_none() {
                return Ok((false, vec![]));
            }
            Ok((true, vec![state.notify(NotificationLevel::Error, message.clone())]))
        }

        WorkerResponse::CheckoutSettled {
            mutation_id,
            outcome: Ok(receipt),
        } => {
            let Some(PendingMutation::Checkout { purchased }) = state.cart.commit(*mutation_id) else {
                return Ok((false, vec![]));
            };
            tracing::info!(tx_hash = %receipt.tx_hash, items = purchased.len(), "order placed");

            let mut actions = vec![state.notify(NotificationLevel::Success, "Order placed successfully")];
            let buyer = state.session.address.clone();
            if state.stale_after_purchase(&purchased, buyer.as_ref()) {
                tracing::debug!(route = %state.route, "active view shows purchased items, refreshing");
                actions.extend(state.fetch_active_view());
            }
            if let Some(address) = buyer {
                actions.push(Action::PostToWorker(WorkerMessage::FetchBalance { address }));
            }
            Ok((true, actions))
        }
        WorkerResponse::CheckoutSettled {
            mutation_id,
            outcome: Err(message),
        } => {
            if state.cart.rollback(*mutation_id).is_none() {
                return Ok((false, vec![]));
            }
            Ok((true, vec![state.notify(NotificationLevel::Error, message.clone())]))
        }

        WorkerResponse::OfferPlaced { item_id } => {
            let mut actions = vec![state.notify(NotificationLevel::Success, "Offer placed successfully")];
            if state.route == Route::Item(*item_id) {
                actions.push(state.fetch_offers(*item_id, 1));
            }
            Ok((true, actions))
        }
        WorkerResponse::ProfileUpdated { profile } => {
            if state.account_view.belongs_to(&profile.address) {
                state.account_view.profile = Some(profile.clone());
            }
            Ok((true, vec![state.notify(NotificationLevel::Success, "Profile updated successfully")]))
        }
        WorkerResponse::ItemCreated => {
            Ok((true, vec![state.notify(NotificationLevel::Success, "Item created successfully")]))
        }

        WorkerResponse::SignedIn { address, reconnected } => {
            tracing::info!(address = %address, reconnected, "signed in");
            state.session.signed_in(address.clone());
            let mut actions = vec![Action::PostToWorker(WorkerMessage::FetchBalance {
                address: address.clone(),
            })];
            if !*reconnected {
                actions.push(state.notify(
                    NotificationLevel::Success,
                    format!("Signed in as {}", address.short()),
                ));
            }
            Ok((true, actions))
        }
        WorkerResponse::SignInFailed { message } => {
            state.session.signed_out();
            Ok((
                true,
                vec![
                    state.notify(NotificationLevel::Error, message.clone()),
                    Action::PostToWorker(WorkerMessage::SignOut { address: None }),
                ],
            ))
        }
        WorkerResponse::NoStoredSession => Ok((false, vec![])),
        WorkerResponse::SignedOut => {
            state.session.signed_out();
            state.cart.close();
            Ok((true, vec![]))
        }
        WorkerResponse::BalanceLoaded { address, balance } => {
            if state.session.address.as_ref() != Some(address) {
                return Ok((false, vec![]));
            }
            state.session.balance = Some(*balance);
            Ok((true, vec![]))
        }

        WorkerResponse::Error { message } => {
            Ok((true, vec![state.notify(NotificationLevel::Error, message.clone())]))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::api::Page;
    use crate::domain::{Address, Item};
    use crate::wallet::TxReceipt;
    use crate::Config;

    fn buyer() -> Address {
        Address::parse("0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d").unwrap()
    }

    fn item(id: u64, price: &str) -> Item {
        Item {
            id: ItemId(id),
            name: format!("item {id}"),
            image: format!("ipfs://{id}"),
            price: price.parse().unwrap(),
            owner: Address::parse("0x00000000000000000000000000000000000000bb").unwrap(),
            description: None,
            start_price: None,
        }
    }

    fn signed_in_state() -> AppState {
        let mut state = AppState::new(&Config::default());
        state.session.signed_in(buyer());
        state
    }

    fn opened_cart(state: &mut AppState, items: Vec<Item>) {
        let seq = state.cart.open();
        state
            .cart
            .loaded(seq, items.into_iter().map(CartItem::from).collect());
    }

    fn posted(actions: &[Action]) -> Vec<&WorkerMessage> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::PostToWorker(message) => Some(message),
                Action::ScheduleEvent { .. } => None,
            })
            .collect()
    }

    #[test]
    fn init_loads_categories_session_and_listing() -> TestResult {
        let mut state = AppState::new(&Config::default());
        let (render, actions) = handle_event(&mut state, &Event::Init)?;

        assert!(render);
        let messages = posted(&actions);
        assert_eq!(messages[0], &WorkerMessage::LoadCategories);
        assert_eq!(messages[1], &WorkerMessage::RestoreSession);
        assert!(
            matches!(messages[2], WorkerMessage::FetchListing { seq: 1, query } if query.page == 1),
            "expected first listing fetch, got {:?}",
            messages[2]
        );
        Ok(())
    }

    #[test]
    fn search_is_debounced_and_resets_page() -> TestResult {
        let mut state = AppState::new(&Config::default());
        handle_event(&mut state, &Event::SetPage(3))?;

        let (_, actions) = handle_event(&mut state, &Event::SetSearch("ape".to_string()))?;
        assert_eq!(state.filter.page(), 1);
        assert_eq!(
            actions,
            vec![Action::ScheduleEvent {
                after: Duration::from_millis(300),
                event: Box::new(Event::DebounceElapsed { seq: 2 }),
            }]
        );
        Ok(())
    }

    #[test]
    fn superseded_debounce_fetches_nothing() -> TestResult {
        let mut state = AppState::new(&Config::default());
        handle_event(&mut state, &Event::SetSearch("a".to_string()))?;
        handle_event(&mut state, &Event::SetSearch("ap".to_string()))?;

        let (render, actions) = handle_event(&mut state, &Event::DebounceElapsed { seq: 1 })?;
        assert!(!render);
        assert!(actions.is_empty());

        let (_, actions) = handle_event(&mut state, &Event::DebounceElapsed { seq: 2 })?;
        assert!(
            matches!(
                posted(&actions)[..],
                [WorkerMessage::FetchListing { seq: 2, query }] if query.search_input.as_deref() == Some("ap")
            ),
            "expected fetch for latest search, got {actions:?}"
        );
        Ok(())
    }

    #[test]
    fn stale_listing_response_is_discarded() -> TestResult {
        let mut state = AppState::new(&Config::default());
        handle_event(&mut state, &Event::SetPage(2))?;
        handle_event(&mut state, &Event::SetPage(3))?;

        let stale = WorkerResponse::ListingLoaded {
            seq: 1,
            page: Page {
                items: vec![item(1, "1")],
                total_pages: 5,
            },
        };
        let (render, _) = handle_event(&mut state, &Event::WorkerResponse(stale))?;
        assert!(!render);
        assert!(state.listing.items.is_empty());

        let fresh = WorkerResponse::ListingLoaded {
            seq: 2,
            page: Page {
                items: vec![item(2, "1")],
                total_pages: 5,
            },
        };
        handle_event(&mut state, &Event::WorkerResponse(fresh))?;
        assert_eq!(state.listing.items[0].id, ItemId(2));
        Ok(())
    }

    #[test]
    fn listing_failure_keeps_results_and_notifies() -> TestResult {
        let mut state = AppState::new(&Config::default());
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![item(1, "1")], 1);
        let action = state.fetch_listing();
        let Action::PostToWorker(WorkerMessage::FetchListing { seq, .. }) = action else {
            panic!("expected listing fetch, got {action:?}");
        };

        let failed = WorkerResponse::ListingFailed {
            seq,
            message: "Failed to fetch items".to_string(),
        };
        handle_event(&mut state, &Event::WorkerResponse(failed))?;

        assert_eq!(state.listing.items.len(), 1);
        assert_eq!(state.listing.error.as_deref(), Some("Failed to fetch items"));
        assert_eq!(state.notifications[0].level, NotificationLevel::Error);
        Ok(())
    }

    #[test]
    fn cart_requires_wallet() -> TestResult {
        let mut state = AppState::new(&Config::default());
        let (_, actions) = handle_event(&mut state, &Event::OpenCart)?;

        assert!(posted(&actions).is_empty());
        assert!(!state.cart.open);
        assert_eq!(state.notifications[0].message, "Connect your wallet to view your cart");
        Ok(())
    }

    #[test]
    fn remove_failure_restores_item_at_index() -> TestResult {
        let mut state = signed_in_state();
        opened_cart(&mut state, vec![item(1, "1"), item(2, "2"), item(3, "3")]);

        let (_, actions) = handle_event(&mut state, &Event::RemoveFromCart(ItemId(2)))?;
        let messages = posted(&actions);
        let [WorkerMessage::RemoveCartItem { mutation_id, .. }] = messages[..] else {
            panic!("expected remove request, got {actions:?}");
        };
        assert_eq!(state.cart.items().len(), 2);

        let settled = WorkerResponse::CartMutationSettled {
            mutation_id: *mutation_id,
            outcome: Err("Failed to remove item".to_string()),
        };
        handle_event(&mut state, &Event::WorkerResponse(settled))?;

        let ids: Vec<_> = state.cart.items().iter().map(|line| line.item_id).collect();
        assert_eq!(ids, vec![ItemId(1), ItemId(2), ItemId(3)]);
        assert_eq!(state.cart.total_price(), Decimal::from(6));
        assert_eq!(state.notifications.last().map(|n| n.message.as_str()), Some("Failed to remove item"));
        Ok(())
    }

    #[test]
    fn destructive_actions_wait_for_pending_mutation() -> TestResult {
        let mut state = signed_in_state();
        opened_cart(&mut state, vec![item(1, "1"), item(2, "2")]);

        handle_event(&mut state, &Event::RemoveFromCart(ItemId(1)))?;
        let (_, actions) = handle_event(&mut state, &Event::ClearCart)?;

        assert!(posted(&actions).is_empty());
        assert_eq!(state.cart.items().len(), 1);
        Ok(())
    }

    #[test]
    fn add_to_cart_uses_shown_item() -> TestResult {
        let mut state = signed_in_state();
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![item(7, "0.5")], 1);
        opened_cart(&mut state, vec![]);

        let (_, actions) = handle_event(&mut state, &Event::AddToCart(ItemId(7)))?;
        assert!(
            matches!(posted(&actions)[..], [WorkerMessage::AddCartItem { item_id: ItemId(7), .. }]),
            "expected add request, got {actions:?}"
        );
        assert!(state.cart.contains(ItemId(7)));
        Ok(())
    }

    #[test]
    fn checkout_without_wallet_is_refused() -> TestResult {
        let mut state = AppState::new(&Config::default());
        let (_, actions) = handle_event(&mut state, &Event::Checkout)?;

        assert!(posted(&actions).is_empty());
        assert_eq!(state.notifications[0].message, "Connect your wallet to place an order");
        Ok(())
    }

    #[test]
    fn checkout_success_refreshes_stale_listing() -> TestResult {
        let mut state = signed_in_state();
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![item(1, "1"), item(9, "1")], 1);
        opened_cart(&mut state, vec![item(1, "1")]);

        let (_, actions) = handle_event(&mut state, &Event::Checkout)?;
        let messages = posted(&actions);
        let [WorkerMessage::Checkout { mutation_id, purchase }] = messages[..] else {
            panic!("expected checkout request, got {actions:?}");
        };
        assert_eq!(purchase.value_wei, 1_000_000_000_000_000_000);

        let settled = WorkerResponse::CheckoutSettled {
            mutation_id: *mutation_id,
            outcome: Ok(TxReceipt {
                tx_hash: "0xabc".to_string(),
            }),
        };
        let (_, actions) = handle_event(&mut state, &Event::WorkerResponse(settled))?;

        assert!(!state.cart.open);
        assert!(state.cart.items().is_empty());
        assert_eq!(state.notifications.last().map(|n| n.message.as_str()), Some("Order placed successfully"));
        let messages = posted(&actions);
        assert!(
            messages.iter().any(|m| matches!(m, WorkerMessage::FetchListing { .. })),
            "expected listing refresh, got {messages:?}"
        );
        assert!(messages.iter().any(|m| matches!(m, WorkerMessage::FetchBalance { .. })));
        Ok(())
    }

    #[test]
    fn checkout_success_skips_refresh_when_not_shown() -> TestResult {
        let mut state = signed_in_state();
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![item(9, "1")], 1);
        opened_cart(&mut state, vec![item(1, "1")]);

        let (_, actions) = handle_event(&mut state, &Event::Checkout)?;
        let messages = posted(&actions);
        let [WorkerMessage::Checkout { mutation_id, .. }] = messages[..] else {
            panic!("expected checkout request, got {actions:?}");
        };
        let settled = WorkerResponse::CheckoutSettled {
            mutation_id: *mutation_id,
            outcome: Ok(TxReceipt {
                tx_hash: "0xabc".to_string(),
            }),
        };
        let (_, actions) = handle_event(&mut state, &Event::WorkerResponse(settled))?;

        assert!(!posted(&actions)
            .iter()
            .any(|m| matches!(m, WorkerMessage::FetchListing { .. })));
        Ok(())
    }

    #[test]
    fn checkout_failure_keeps_cart() -> TestResult {
        let mut state = signed_in_state();
        opened_cart(&mut state, vec![item(1, "1"), item(2, "2")]);

        let (_, actions) = handle_event(&mut state, &Event::Checkout)?;
        let messages = posted(&actions);
        let [WorkerMessage::Checkout { mutation_id, .. }] = messages[..] else {
            panic!("expected checkout request, got {actions:?}");
        };
        let settled = WorkerResponse::CheckoutSettled {
            mutation_id: *mutation_id,
            outcome: Err("user rejected transaction".to_string()),
        };
        handle_event(&mut state, &Event::WorkerResponse(settled))?;

        assert!(state.cart.open);
        assert_eq!(state.cart.items().len(), 2);
        assert!(state.cart.controls_enabled());
        Ok(())
    }

    #[test]
    fn failed_sign_in_disconnects() -> TestResult {
        let mut state = AppState::new(&Config::default());
        handle_event(&mut state, &Event::ConnectWallet)?;
        assert_eq!(state.session.phase, LoginPhase::SigningIn);

        let failed = WorkerResponse::SignInFailed {
            message: "Login failed".to_string(),
        };
        let (_, actions) = handle_event(&mut state, &Event::WorkerResponse(failed))?;

        assert_eq!(state.session.phase, LoginPhase::Disconnected);
        assert_eq!(posted(&actions), vec![&WorkerMessage::SignOut { address: None }]);
        assert_eq!(state.notifications[0].message, "Login failed");
        Ok(())
    }

    #[test]
    fn offer_above_balance_is_refused() -> TestResult {
        let mut state = signed_in_state();
        state.session.balance = Some(Decimal::ONE);
        state.route = Route::Item(ItemId(4));

        let event = Event::PlaceOffer {
            price: Decimal::from(2),
            accept_terms: true,
        };
        let (_, actions) = handle_event(&mut state, &event)?;

        assert!(posted(&actions).is_empty());
        assert_eq!(state.notifications[0].message, "Insufficient balance");
        Ok(())
    }

    #[test]
    fn notification_expiry_removes_it() -> TestResult {
        let mut state = AppState::new(&Config::default());
        state.notify(NotificationLevel::Info, "hello");

        let (render, _) = handle_event(&mut state, &Event::NotificationExpired(1))?;
        assert!(render);
        assert!(state.notifications.is_empty());

        let (render, _) = handle_event(&mut state, &Event::DismissNotification(1))?;
        assert!(!render);
        Ok(())
    }
}
