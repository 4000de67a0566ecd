//! HTTP client for a local wallet bridge.
//!
//! The bridge is a small companion service that owns the actual wallet
//! (browser extension, hardware signer, ...) and exposes it over HTTP:
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /account` | currently connected account |
//! | `POST /connect` | prompt for connection |
//! | `POST /sign` | personal-sign a message |
//! | `POST /disconnect` | drop the connection |
//! | `POST /batch-buy` | submit `batchBuy` and wait for the receipt |
//! | `GET /balance/{address}` | native balance in ether |

use async_trait::async_trait;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Address, DexyError, Result};
use crate::wallet::purchase::BatchPurchase;
use crate::wallet::session::{AuthSession, ContractClient, TxReceipt};

#[derive(Debug, Clone)]
pub struct HttpWalletBridge {
    base_url: String,
    http: Client,
}

impl HttpWalletBridge {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Reads the failure body of a rejected bridge call.
    async fn rejection(response: Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<BridgeError>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("bridge request failed with status {status}: {text}"))
    }
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    address: Address,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Decimal,
}

#[async_trait]
impl AuthSession for HttpWalletBridge {
    async fn account(&self) -> Result<Option<Address>> {
        let response = self.http.get(self.url("/account")).send().await?;
        if !response.status().is_success() {
            return Err(DexyError::Wallet(Self::rejection(response).await));
        }
        let parsed: AccountResponse = response.json().await?;
        Ok(parsed.address)
    }

    async fn connect(&self) -> Result<Address> {
        let response = self.http.post(self.url("/connect")).send().await?;
        if !response.status().is_success() {
            return Err(DexyError::Wallet(Self::rejection(response).await));
        }
        let parsed: ConnectResponse = response.json().await?;
        Ok(parsed.address)
    }

    async fn sign_challenge(&self, message: &str) -> Result<String> {
        let body = serde_json::json!({ "message": message });
        let response = self.http.post(self.url("/sign")).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(DexyError::Wallet(Self::rejection(response).await));
        }
        let parsed: SignResponse = response.json().await?;
        Ok(parsed.signature)
    }

    async fn disconnect(&self) -> Result<()> {
        let response = self.http.post(self.url("/disconnect")).send().await?;
        if !response.status().is_success() {
            return Err(DexyError::Wallet(Self::rejection(response).await));
        }
        Ok(())
    }
}

#[async_trait]
impl ContractClient for HttpWalletBridge {
    async fn batch_buy(&self, purchase: &BatchPurchase) -> Result<TxReceipt> {
        let response = self
            .http
            .post(self.url("/batch-buy"))
            .json(purchase)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DexyError::Contract(Self::rejection(response).await));
        }
        Ok(response.json().await?)
    }

    async fn balance(&self, address: &Address) -> Result<Decimal> {
        let response = self
            .http
            .get(self.url(&format!("/balance/{address}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DexyError::Wallet(Self::rejection(response).await));
        }
        let parsed: BalanceResponse = response.json().await?;
        Ok(parsed.balance)
    }
}
