//! Wallet and contract capabilities.
//!
//! Both are injected into the worker explicitly so the storefront core never
//! reads wallet state from anywhere else, and tests can substitute mocks.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Address, Result};
use crate::wallet::purchase::BatchPurchase;

/// A connected (or connectable) wallet account.
#[automock]
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// The account the wallet is currently connected with, if any.
    async fn account(&self) -> Result<Option<Address>>;

    /// Asks the wallet to connect and returns the selected account.
    async fn connect(&self) -> Result<Address>;

    /// Signs `message` with the connected account (personal-sign).
    async fn sign_challenge(&self, message: &str) -> Result<String>;

    async fn disconnect(&self) -> Result<()>;
}

/// Receipt of a mined purchase transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
}

/// The marketplace contract, reached through the wallet.
#[automock]
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Submits `batchBuy` and waits for the receipt.
    async fn batch_buy(&self, purchase: &BatchPurchase) -> Result<TxReceipt>;

    /// Native balance of `address`, in ether.
    async fn balance(&self, address: &Address) -> Result<Decimal>;
}
