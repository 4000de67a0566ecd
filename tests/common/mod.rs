//! Shared fixtures for driving the runtime against mocked collaborators.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;
use testresult::TestResult;

use dexy::api::{MockMarketplaceApi, Page};
use dexy::domain::{Address, Category, Item, ItemId};
use dexy::runtime::Runtime;
use dexy::storage::JsonCredentialStore;
use dexy::wallet::{MockAuthSession, MockContractClient};
use dexy::worker::DexyWorker;
use dexy::{Config, Event};

pub const BUYER: &str = "0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d";
pub const SELLER: &str = "0x00000000000000000000000000000000000000bb";

pub fn buyer() -> Address {
    Address::parse(BUYER).unwrap()
}

pub fn item(id: u64, price: &str) -> Item {
    Item {
        id: ItemId(id),
        name: format!("Doge #{id}"),
        image: format!("ipfs://doge/{id}"),
        price: price.parse::<Decimal>().unwrap(),
        owner: Address::parse(SELLER).unwrap(),
        description: None,
        start_price: None,
    }
}

/// Counts calls made from inside mock closures.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Categories, a fixed listing page and token handling.
pub fn expect_storefront(api: &mut MockMarketplaceApi, listing: Vec<Item>, calls: &Calls) {
    api.expect_categories().returning(|| {
        Ok(vec![Category {
            id: 2,
            name: "Art".to_string(),
        }])
    });
    let calls = calls.clone();
    api.expect_list_items().returning(move |_| {
        calls.hit();
        Ok(Page {
            items: listing.clone(),
            total_pages: 3,
        })
    });
    api.expect_set_token().return_const(());
}

/// A wallet with no restorable session that signs every login.
pub fn signing_wallet() -> MockAuthSession {
    let mut wallet = MockAuthSession::new();
    wallet.expect_account().returning(|| Ok(None));
    wallet.expect_connect().returning(|| Ok(buyer()));
    wallet
        .expect_sign_challenge()
        .returning(|_| Ok("0xsignature".to_string()));
    wallet.expect_disconnect().returning(|| Ok(()));
    wallet
}

pub fn funded_contract() -> MockContractClient {
    let mut contract = MockContractClient::new();
    contract
        .expect_balance()
        .returning(|_| Ok(Decimal::from(10)));
    contract
}

pub struct Harness {
    pub runtime: Runtime,
    _dir: TempDir,
}

impl Harness {
    pub fn new(
        api: MockMarketplaceApi,
        wallet: MockAuthSession,
        contract: MockContractClient,
        config: &Config,
    ) -> TestResult<Self> {
        let dir = tempfile::tempdir()?;
        let store = JsonCredentialStore::new(dir.path().join("credentials.json"))?;
        let worker = DexyWorker::new(
            Arc::new(api),
            Arc::new(wallet),
            Arc::new(contract),
            Box::new(store),
            config.login_message.as_str(),
        );
        let runtime = Runtime::new(dexy::initialize(config), Arc::new(worker));
        Ok(Self { runtime, _dir: dir })
    }

    /// Dispatches `event` and handles everything it caused on the worker.
    pub async fn send(&mut self, event: Event) {
        self.runtime.dispatch(&event);
        self.runtime.run_until_idle().await;
    }

    /// Mounts the storefront and signs in.
    pub async fn start_signed_in(&mut self) {
        self.send(Event::Init).await;
        self.send(Event::ConnectWallet).await;
    }
}
