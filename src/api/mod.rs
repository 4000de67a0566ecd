//! REST API layer.
//!
//! - [`backend`]: The [`MarketplaceApi`] trait the worker calls through
//! - [`http`]: `reqwest`-backed implementation with bearer-token auth
//! - [`models`]: Wire records and pagination envelope
//! - [`query`]: Listing query built from the filter state

pub mod backend;
pub mod http;
pub mod models;
pub mod query;

pub use backend::{MarketplaceApi, MockMarketplaceApi};
pub use http::HttpApi;
pub use models::Page;
pub use query::ListingQuery;
