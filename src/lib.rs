//! DeXy: headless storefront core for a decentralized marketplace.
//!
//! The crate owns the client-side state machines between user intent and the
//! marketplace services:
//! - Filter and pagination of the item listing, with debounced search and
//!   sequence-tagged fetches so stale responses never win
//! - An optimistic cart: mutations apply locally, roll back exactly on
//!   failure, and a single pending slot gates conflicting actions
//! - Checkout through an on-chain `batchBuy`, refreshing the active view only
//!   when it could show stale ownership
//! - Wallet sign-in through an injected [`wallet::AuthSession`], with the
//!   bearer token kept in a JSON credential store
//! - Item detail with offers, account profile and history, item creation
//!
//! Persistent state and business rules live in the REST API and the contract.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI shell (main.rs) + event loop (runtime)         │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Filter, listing, cart, session controllers       │
//! │  - Event handling and action dispatching            │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Worker Layer  │   │ Storage Layer │
//! │ (ui/)         │   │ (worker/)     │   │ (storage/)    │
//! │ - View model  │   │ - REST calls  │   │ - Credentials │
//! │ - Text render │   │ - Wallet flow │   │ - Atomic JSON │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Collaborators: api/ (REST), wallet/ (bridge)       │
//! │  Domain types and errors (domain/)                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Items, cart lines, offers, profiles, errors
//! - [`api`]: Marketplace REST backend trait and reqwest implementation
//! - [`wallet`]: Wallet/auth and contract collaborators, purchase building
//! - [`storage`]: JSON credential store
//! - [`worker`]: Async executor of worker messages
//! - [`runtime`]: Event loop wiring actions, timers and the worker
//! - [`ui`]: Text rendering of the view model
//! - [`observability`]: Rotating JSON log file
//!
//! # Configuration
//!
//! ```toml
//! api_url = "https://api.dexy.example"
//! bridge_url = "http://127.0.0.1:8545"
//! page_size = 4
//! search_debounce_ms = 300
//! login_message = "Sign in to DeXy"
//! log_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use dexy::{handle_event, initialize, Config, Event};
//!
//! let config = Config::default();
//! let mut state = initialize(&config);
//!
//! let (_, actions) = handle_event(&mut state, &Event::Init)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), dexy::DexyError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod storage;
pub mod ui;
pub mod wallet;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, Route};
pub use domain::{DexyError, Result};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default listing page size.
pub const DEFAULT_PAGE_SIZE: u32 = 4;

/// Default quiet period before a search change is fetched.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Storefront configuration.
///
/// Loaded from a TOML file or a string map; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the marketplace REST API.
    pub api_url: String,

    /// Base URL of the local wallet bridge.
    pub bridge_url: String,

    /// Items per listing page. Default: 4
    pub page_size: u32,

    /// Search debounce in milliseconds; `0` fetches on every keystroke. Default: 300
    pub search_debounce_ms: u64,

    /// Message signed on a fresh wallet login.
    pub login_message: String,

    /// Directory for logs and credentials. See [`infrastructure::data_dir`].
    pub data_dir: Option<PathBuf>,

    /// Log level filter, e.g. `debug` or `dexy=trace`. Default: `"info"`
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            bridge_url: "http://127.0.0.1:8545".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            login_message: "Sign in to DeXy".to_string(),
            data_dir: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, such as environment-style
    /// key/value pairs.
    ///
    /// Unparsable numbers keep their defaults; a zero page size is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use dexy::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "12".to_string());
    /// map.insert("search_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 12);
    /// assert_eq!(config.search_debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        Self {
            api_url: text("api_url").map_or(defaults.api_url, str::to_string),
            bridge_url: text("bridge_url").map_or(defaults.bridge_url, str::to_string),
            page_size: text("page_size")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            search_debounce_ms: text("search_debounce_ms")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_debounce_ms),
            login_message: text("login_message").map_or(defaults.login_message, str::to_string),
            data_dir: text("data_dir").map(PathBuf::from),
            log_level: text("log_level").map(str::to_string),
        }
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DexyError::Io`] if the file cannot be read and
    /// [`DexyError::Config`] if it is not valid TOML or has a zero page size.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// # Errors
    ///
    /// Returns [`DexyError::Config`] for invalid TOML or a zero page size.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| DexyError::Config(format!("invalid config: {e}")))?;
        if config.page_size == 0 {
            return Err(DexyError::Config("page_size must be at least 1".to_string()));
        }
        Ok(config)
    }
}

/// Initializes the storefront with configuration.
///
/// Returns the state a freshly mounted storefront starts from; post
/// [`Event::Init`] to load categories, restore the session and fetch the
/// first page.
///
/// # Example
///
/// ```rust
/// use dexy::{initialize, Config, Route};
///
/// let state = initialize(&Config::default());
/// assert_eq!(state.route, Route::Marketplace);
/// assert_eq!(state.filter.page(), 1);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        api_url = %config.api_url,
        page_size = config.page_size,
        search_debounce_ms = config.search_debounce_ms,
        "initializing storefront"
    );
    AppState::new(config)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn toml_overrides_keep_other_defaults() -> TestResult {
        let config = Config::from_toml("api_url = \"https://api.example\"\nsearch_debounce_ms = 0\n")?;
        assert_eq!(config.api_url, "https://api.example");
        assert_eq!(config.search_debounce_ms, 0);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = Config::from_toml("page_size = 0").unwrap_err();
        assert!(matches!(err, DexyError::Config(_)), "expected Config, got {err:?}");
    }

    #[test]
    fn config_file_is_read() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dexy.toml");
        std::fs::write(&path, "page_size = 8\nlog_level = \"debug\"\n")?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.page_size, 8);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        Ok(())
    }
}
