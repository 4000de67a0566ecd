//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the runtime (event loop and CLI) and the
//! domain/api/worker layers. Every state change goes through
//! [`handle_event`]; network calls leave it as [`Action`]s and come back as
//! [`Event::WorkerResponse`].
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`filter`]: Filter and pagination controller for the marketplace listing
//! - [`listing`]: Sequence-tagged listing results
//! - [`cart`]: Optimistic cart mutations with rollback
//! - [`session`]: Wallet sign-in state
//! - [`views`]: Item and account detail views
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Routes of the storefront
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use dexy::app::FilterState;
//!
//! let mut filter = FilterState::default();
//! filter.set_page(4);
//! filter.set_category("Art");
//! assert_eq!(filter.page(), 1);
//! ```

pub mod actions;
pub mod cart;
pub mod filter;
pub mod handler;
pub mod listing;
pub mod modes;
pub mod session;
pub mod state;
pub mod views;

pub use actions::Action;
pub use cart::{CartState, PendingMutation};
pub use filter::FilterState;
pub use handler::{handle_event, Event};
pub use listing::ListingState;
pub use modes::Route;
pub use session::{LoginPhase, SessionState};
pub use state::AppState;
pub use views::{AccountView, ItemView};
