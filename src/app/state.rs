//! Application state and the request helpers built on it.
//!
//! [`AppState`] composes the per-concern controllers (filter, listing, cart,
//! session, detail views, notifications) and is owned by the event loop. The
//! helpers here issue sequence numbers and build the worker requests, so the
//! event handler reads as a list of transitions.
//!
//! # State Components
//!
//! - **Route**: Which view is active and therefore fetched
//! - **Filter / Listing**: Marketplace query and its latest results
//! - **Cart**: Optimistic cart projection and its pending mutation
//! - **Session**: Signed-in wallet, if any
//! - **Item / Account views**: Detail view data, tagged with a view sequence
//! - **Notifications**: Transient messages with scheduled expiry
//!
//! # Example
//!
//! ```rust
//! use dexy::app::AppState;
//! use dexy::Config;
//!
//! let state = AppState::new(&Config::default());
//! let viewmodel = state.compute_viewmodel();
//! assert!(viewmodel.notifications.is_empty());
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use rust_decimal::Decimal;

use crate::api::ListingQuery;
use crate::app::actions::Action;
use crate::app::cart::CartState;
use crate::app::filter::FilterState;
use crate::app::handler::Event;
use crate::app::listing::ListingState;
use crate::app::modes::Route;
use crate::app::session::{LoginPhase, SessionState};
use crate::app::views::{AccountView, ItemView};
use crate::domain::notification::NOTIFICATION_TTL_MS;
use crate::domain::{Address, Categories, Item, ItemId, Notification, NotificationLevel, UserProfile};
use crate::ui::viewmodel::{
    AccountInfo, Body, CartInfo, CartLine, DisplayItem, EmptyState, FilterBarInfo, FooterInfo, HeaderInfo,
    ItemDetailInfo, MarketplaceInfo, NotificationInfo, OfferRow, TransactionRow, UIViewModel,
};
use crate::worker::WorkerMessage;
use crate::Config;

/// Central application state, owned by the event loop.
#[derive(Debug, Clone)]
pub struct AppState {
    pub route: Route,
    pub filter: FilterState,
    pub listing: ListingState,
    pub categories: Categories,
    pub cart: CartState,
    pub session: SessionState,
    pub item_view: ItemView,
    pub account_view: AccountView,
    pub notifications: Vec<Notification>,

    /// Tag of the latest item or account fetch.
    view_seq: u64,
    next_notification_id: u64,
    page_size: u32,
    search_debounce: Duration,
}

impl AppState {
    /// Creates the state a freshly mounted storefront starts from.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            route: Route::default(),
            filter: FilterState::default(),
            listing: ListingState::default(),
            categories: Categories::default(),
            cart: CartState::default(),
            session: SessionState::default(),
            item_view: ItemView::default(),
            account_view: AccountView::default(),
            notifications: Vec::new(),
            view_seq: 0,
            next_notification_id: 0,
            page_size: config.page_size,
            search_debounce: Duration::from_millis(config.search_debounce_ms),
        }
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    #[must_use]
    pub const fn is_current_view(&self, seq: u64) -> bool {
        seq == self.view_seq
    }

    /// Builds the listing request for `seq` from the current filter.
    fn listing_request(&mut self, seq: u64) -> Action {
        self.listing.loading = true;
        let query = ListingQuery::from_filter(&self.filter, &self.categories, self.page_size);
        tracing::debug!(seq, page = query.page, search = ?query.search_input, "fetching listing");
        Action::PostToWorker(WorkerMessage::FetchListing { seq, query })
    }

    /// Fetches the listing under a fresh sequence number.
    pub fn fetch_listing(&mut self) -> Action {
        let seq = self.listing.next_seq();
        self.listing_request(seq)
    }

    /// Fetches the listing for a debounce timer, unless a newer change superseded it.
    pub fn fetch_listing_if_current(&mut self, seq: u64) -> Option<Action> {
        if !self.listing.is_current(seq) {
            tracing::trace!(seq, latest = self.listing.latest_seq(), "debounce superseded");
            return None;
        }
        Some(self.listing_request(seq))
    }

    /// Schedules a debounced listing fetch.
    ///
    /// The sequence number is issued now, so any change made before the timer
    /// fires invalidates it.
    pub fn debounce_listing(&mut self) -> Action {
        let seq = self.listing.next_seq();
        if self.search_debounce.is_zero() {
            return self.listing_request(seq);
        }
        Action::ScheduleEvent {
            after: self.search_debounce,
            event: Box::new(Event::DebounceElapsed { seq }),
        }
    }

    /// Fetches one offer page of the shown item.
    pub fn fetch_offers(&mut self, item_id: ItemId, page: u32) -> Action {
        self.view_seq += 1;
        self.item_view.offer_page = page.max(1);
        Action::PostToWorker(WorkerMessage::FetchOffers {
            seq: self.view_seq,
            item_id,
            page: self.item_view.offer_page,
        })
    }

    /// Refetches whatever the active route shows.
    pub fn fetch_active_view(&mut self) -> Vec<Action> {
        self.view_seq += 1;
        let seq = self.view_seq;
        match self.route.clone() {
            Route::Marketplace => vec![self.fetch_listing()],
            Route::Item(item_id) => {
                self.item_view.loading = true;
                vec![Action::PostToWorker(WorkerMessage::FetchItem {
                    seq,
                    item_id,
                    offer_page: self.item_view.offer_page,
                })]
            }
            Route::Account(address) => {
                self.account_view.loading = true;
                vec![Action::PostToWorker(WorkerMessage::FetchAccount { seq, address })]
            }
            Route::Create => vec![],
        }
    }

    /// Switches to `route`, resetting detail views, and fetches it.
    pub fn navigate(&mut self, route: Route) -> Vec<Action> {
        tracing::debug!(from = %self.route, to = %route, "navigating");
        self.route = route;
        self.item_view = ItemView::default();
        self.account_view = AccountView::default();
        self.fetch_active_view()
    }

    /// Whether the active view could show ownership that `purchased` just changed.
    ///
    /// True for a marketplace page listing a purchased item, the detail page of a
    /// purchased item, and an account page that lists a purchased item or
    /// belongs to the buyer.
    #[must_use]
    pub fn stale_after_purchase(&self, purchased: &[ItemId], buyer: Option<&Address>) -> bool {
        match &self.route {
            Route::Marketplace => self.listing.shows_any(purchased),
            Route::Item(id) => purchased.contains(id),
            Route::Account(address) => {
                buyer.is_some_and(|buyer| buyer == address) || self.account_view.lists_any(purchased)
            }
            Route::Create => false,
        }
    }

    /// Queues a notification and schedules its expiry.
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) -> Action {
        self.next_notification_id += 1;
        let id = self.next_notification_id;
        let message = message.into();

        match level {
            NotificationLevel::Error => tracing::warn!(id, message = %message, "error notification"),
            _ => tracing::debug!(id, message = %message, "notification"),
        }

        self.notifications.push(Notification {
            id,
            level,
            message,
            created_at: Utc::now(),
        });

        Action::ScheduleEvent {
            after: Duration::from_millis(NOTIFICATION_TTL_MS.unsigned_abs()),
            event: Box::new(Event::NotificationExpired(id)),
        }
    }

    /// Removes notification `id`. Returns whether it was still shown.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    /// Drops every notification older than its time to live.
    pub fn prune_notifications(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired(now));
        self.notifications.len() != before
    }

    /// Computes the view model for rendering.
    ///
    /// Formats prices and addresses, computes fuzzy highlight ranges for
    /// listing rows against the active search text, and projects the cart and
    /// notification queue.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use dexy::app::AppState;
    /// # use dexy::ui::viewmodel::Body;
    /// # let state = AppState::new(&dexy::Config::default());
    /// let viewmodel = state.compute_viewmodel();
    /// assert!(matches!(viewmodel.body, Body::Marketplace(_)));
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let matcher = if self.filter.search_text().trim().is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        UIViewModel {
            header: self.compute_header(),
            body: self.compute_body(matcher.as_ref()),
            cart: self.compute_cart(),
            notifications: self
                .notifications
                .iter()
                .map(|n| NotificationInfo {
                    id: n.id,
                    level: n.level,
                    message: n.message.clone(),
                })
                .collect(),
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match &self.route {
            Route::Marketplace => "Marketplace".to_string(),
            Route::Item(_) => self
                .item_view
                .item
                .as_ref()
                .map_or_else(|| "Item".to_string(), |item| item.name.clone()),
            Route::Account(address) => format!("Account {}", address.short()),
            Route::Create => "Create item".to_string(),
        };

        let account = match (self.session.phase, &self.session.address) {
            (LoginPhase::SignedIn, Some(address)) => match self.session.balance {
                Some(balance) => format!("{} ({} ETH)", address.short(), balance.round_dp(4).normalize()),
                None => address.short(),
            },
            (LoginPhase::SigningIn, _) => "signing in...".to_string(),
            _ => "not connected".to_string(),
        };

        HeaderInfo { title, account }
    }

    fn compute_body(&self, matcher: Option<&SkimMatcherV2>) -> Body {
        match &self.route {
            Route::Marketplace => {
                let items: Vec<DisplayItem> = self
                    .listing
                    .items
                    .iter()
                    .map(|item| self.compute_display_item(item, matcher))
                    .collect();
                let empty_state = (items.is_empty() && !self.listing.loading && self.listing.error.is_none())
                    .then(|| EmptyState {
                        message: "No items found".to_string(),
                        subtitle: "Try another search, price range or category".to_string(),
                    });

                Body::Marketplace(MarketplaceInfo {
                    filter: self.compute_filter_bar(),
                    items,
                    page: self.filter.page(),
                    total_pages: self.listing.total_pages.max(1),
                    loading: self.listing.loading,
                    error: self.listing.error.clone(),
                    empty_state,
                })
            }
            Route::Item(_) => {
                let view = &self.item_view;
                let (name, description, price, owner) = view.item.as_ref().map_or_else(
                    || (String::new(), String::new(), String::new(), String::new()),
                    |item| {
                        (
                            item.name.clone(),
                            item.description.clone().unwrap_or_default(),
                            item.price.normalize().to_string(),
                            item.owner.short(),
                        )
                    },
                );
                Body::Item(ItemDetailInfo {
                    name,
                    description,
                    price,
                    owner,
                    offers: view
                        .offers
                        .iter()
                        .map(|offer| OfferRow {
                            price: offer.price.normalize().to_string(),
                            from: offer.from.short(),
                            date: offer.date.clone(),
                        })
                        .collect(),
                    offer_page: view.offer_page,
                    offer_total_pages: view.offer_total_pages.max(1),
                    loading: view.loading,
                    error: view.error.clone(),
                })
            }
            Route::Account(address) => {
                let view = &self.account_view;
                Body::Account(AccountInfo {
                    address: address.to_string(),
                    display_name: view
                        .profile
                        .as_ref()
                        .map_or_else(|| address.short(), UserProfile::display_name),
                    email: view
                        .profile
                        .as_ref()
                        .and_then(|profile| profile.email.clone())
                        .unwrap_or_default(),
                    items: view
                        .items
                        .iter()
                        .map(|item| self.compute_display_item(item, None))
                        .collect(),
                    transactions: view
                        .transactions
                        .iter()
                        .map(|tx| TransactionRow {
                            event: tx.event.clone(),
                            item_name: tx.item_name.clone(),
                            price: tx.price.normalize().to_string(),
                            date: tx.date.clone(),
                        })
                        .collect(),
                    loading: view.loading,
                    error: view.error.clone(),
                })
            }
            Route::Create => Body::Create,
        }
    }

    fn compute_filter_bar(&self) -> FilterBarInfo {
        let bound = |price: Option<Decimal>| price.map(|p| p.normalize().to_string()).unwrap_or_default();
        FilterBarInfo {
            search: self.filter.search_text().to_string(),
            min_price: bound(self.filter.min_price()),
            max_price: bound(self.filter.max_price()),
            sort: self.filter.sort_key().label().to_string(),
            category: self.filter.category().to_string(),
            categories: self.categories.names().map(str::to_string).collect(),
        }
    }

    fn compute_display_item(&self, item: &Item, matcher: Option<&SkimMatcherV2>) -> DisplayItem {
        DisplayItem {
            id: item.id,
            name: item.name.clone(),
            price: item.price.normalize().to_string(),
            owner: item.owner.short(),
            in_cart: self.cart.contains(item.id),
            highlight_ranges: matcher.map_or_else(Vec::new, |m| {
                compute_highlight_ranges(&item.name, self.filter.search_text(), m)
            }),
        }
    }

    fn compute_cart(&self) -> Option<CartInfo> {
        if !self.cart.open {
            return None;
        }
        Some(CartInfo {
            lines: self
                .cart
                .items()
                .iter()
                .map(|line| CartLine {
                    id: line.item_id,
                    name: line.display_name.clone(),
                    price: line.unit_price.normalize().to_string(),
                })
                .collect(),
            total: self.cart.display_total().to_string(),
            loading: self.cart.loading,
            busy: self.cart.mutation_loading(),
            submitting: self.cart.submitting(),
        })
    }

    fn compute_footer(&self) -> FooterInfo {
        let commands = match (&self.route, self.cart.open) {
            (_, true) => "remove <id>  clear  checkout  close  help",
            (Route::Marketplace, false) => {
                "search <text>  min/max <price>  sort <key>  category <name>  page <n>  item <id>  add <id>  cart  help"
            }
            (Route::Item(_), false) => "offers <page>  offer <price>  add <id>  back  help",
            (Route::Account(_), false) => "profile <username> <email>  back  help",
            (Route::Create, false) => "create <name> <start> <fix> [description]  back  help",
        };
        FooterInfo {
            commands: commands.to_string(),
        }
    }
}

/// Coalesces fuzzy match indices of `query` in `text` into `(start, end)` ranges.
fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query.trim()) else {
        return vec![];
    };

    let mut ranges = Vec::new();
    let mut run: Option<(usize, usize)> = None;
    for idx in indices {
        run = match run {
            Some((start, prev)) if idx == prev + 1 => Some((start, idx)),
            Some((start, prev)) => {
                ranges.push((start, prev + 1));
                Some((idx, idx))
            }
            None => Some((idx, idx)),
        };
    }
    if let Some((start, prev)) = run {
        ranges.push((start, prev + 1));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64) -> Item {
        Item {
            id: ItemId(id),
            name: format!("item {id}"),
            image: String::new(),
            price: Decimal::ONE,
            owner: Address::parse("0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d").unwrap(),
            description: None,
            start_price: None,
        }
    }

    #[test]
    fn purchase_on_shown_page_is_stale() {
        let mut state = AppState::new(&Config::default());
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![item(1), item(2)], 1);

        assert!(state.stale_after_purchase(&[ItemId(2)], None));
        assert!(!state.stale_after_purchase(&[ItemId(3)], None));
    }

    #[test]
    fn purchase_of_shown_item_is_stale() {
        let mut state = AppState::new(&Config::default());
        state.route = Route::Item(ItemId(5));
        assert!(state.stale_after_purchase(&[ItemId(5)], None));
        assert!(!state.stale_after_purchase(&[ItemId(6)], None));
    }

    #[test]
    fn buyers_own_account_page_is_stale() {
        let buyer = Address::parse("0x00000000000000000000000000000000000000aa").unwrap();
        let mut state = AppState::new(&Config::default());
        state.route = Route::Account(buyer.clone());
        assert!(state.stale_after_purchase(&[ItemId(1)], Some(&buyer)));

        let other = Address::parse("0x00000000000000000000000000000000000000bb").unwrap();
        assert!(!state.stale_after_purchase(&[ItemId(1)], Some(&other)));
    }

    #[test]
    fn notifications_expire_by_id() {
        let mut state = AppState::new(&Config::default());
        let action = state.notify(NotificationLevel::Success, "Item removed successfully");
        assert_eq!(
            action,
            Action::ScheduleEvent {
                after: Duration::from_millis(3000),
                event: Box::new(Event::NotificationExpired(1)),
            }
        );
        assert!(state.dismiss(1));
        assert!(!state.dismiss(1));
    }

    #[test]
    fn search_text_highlights_matched_characters() {
        let mut state = AppState::new(&Config::default());
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![item(1)], 1);
        state.filter.set_search("item");

        let Body::Marketplace(info) = state.compute_viewmodel().body else {
            panic!("expected marketplace body");
        };
        assert_eq!(info.items[0].highlight_ranges, vec![(0, 4)]);
    }

    #[test]
    fn settled_empty_listing_shows_empty_state() {
        let mut state = AppState::new(&Config::default());
        let seq = state.listing.next_seq();
        state.listing.apply(seq, vec![], 1);

        let Body::Marketplace(info) = state.compute_viewmodel().body else {
            panic!("expected marketplace body");
        };
        assert!(info.empty_state.is_some());
        assert!(info.items.is_empty());
    }

    #[test]
    fn open_cart_shows_rounded_total() {
        let mut state = AppState::new(&Config::default());
        let seq = state.cart.open();
        let mut cheap = item(1);
        cheap.price = "0.12345".parse().unwrap();
        state.cart.loaded(seq, vec![cheap.into(), item(2).into()]);

        let cart = state.compute_viewmodel().cart.unwrap();
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total, "1.123");
        assert!(!cart.busy);
    }

    #[test]
    fn prune_drops_only_stale_notifications() {
        let mut state = AppState::new(&Config::default());
        state.notify(NotificationLevel::Info, "old");
        state.notify(NotificationLevel::Info, "new");
        state.notifications[0].created_at -= chrono::Duration::seconds(5);

        assert!(state.prune_notifications(Utc::now()));
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].message, "new");
        assert!(!state.prune_notifications(Utc::now()));
    }
}
