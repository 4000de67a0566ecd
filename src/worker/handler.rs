//! Worker executing storefront requests against the API, wallet and contract.
//!
//! The event loop never awaits a network call itself. It posts a
//! [`WorkerMessage`] and the runtime hands it to [`DexyWorker::handle_message`]
//! on a tokio task; the [`WorkerResponse`] comes back to the loop as an event.
//! Failures never escape as errors: every request resolves to a response,
//! failed ones carrying the message to show the user.

use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use tracing::Instrument;

use crate::api::MarketplaceApi;
use crate::domain::error::{DexyError, Result};
use crate::domain::{Address, ItemId};
use crate::storage::{CredentialRecord, CredentialStore};
use crate::wallet::{AuthSession, ContractClient};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Offers shown per page on the item view.
pub const OFFERS_PER_PAGE: u32 = 5;

/// Executes [`WorkerMessage`]s. Shared between tasks behind an [`Arc`].
pub struct DexyWorker {
    api: Arc<dyn MarketplaceApi>,
    wallet: Arc<dyn AuthSession>,
    contract: Arc<dyn ContractClient>,
    credentials: Mutex<Box<dyn CredentialStore>>,
    login_message: String,
}

impl DexyWorker {
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        wallet: Arc<dyn AuthSession>,
        contract: Arc<dyn ContractClient>,
        credentials: Box<dyn CredentialStore>,
        login_message: impl Into<String>,
    ) -> Self {
        Self {
            api,
            wallet,
            contract,
            credentials: Mutex::new(credentials),
            login_message: login_message.into(),
        }
    }

    /// Logs the outcome of an operation and maps it to a response.
    ///
    /// On failure, `on_failure` receives the user-facing message derived from
    /// `fallback`.
    fn handle_result<T>(
        operation: &str,
        fallback: &str,
        result: Result<T>,
        on_success: impl FnOnce(T) -> WorkerResponse,
        on_failure: impl FnOnce(String) -> WorkerResponse,
    ) -> WorkerResponse {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "worker operation failed");
                on_failure(e.user_message(fallback))
            }
        }
    }

    fn with_credentials<T>(&self, f: impl FnOnce(&mut dyn CredentialStore) -> Result<T>) -> Result<T> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|_| DexyError::Worker("credential store lock poisoned".to_string()))?;
        f(guard.as_mut())
    }

    async fn sign_in(&self) -> Result<Address> {
        let address = self.wallet.connect().await?;
        tracing::debug!(address = %address, "wallet connected, signing login message");

        let signature = self.wallet.sign_challenge(&self.login_message).await?;
        let token = self
            .api
            .login(&address, &self.login_message, &signature)
            .await?;
        self.api.set_token(Some(token.clone()));

        if let Err(e) = self.with_credentials(|store| store.put(CredentialRecord::new(address.clone(), token))) {
            tracing::warn!(error = %e, "failed to persist credentials");
        }

        Ok(address)
    }

    async fn restore_session(&self) -> Result<Option<Address>> {
        let Some(address) = self.wallet.account().await? else {
            return Ok(None);
        };
        let Some(record) = self.with_credentials(|store| store.get(&address))? else {
            tracing::debug!(address = %address, "connected wallet has no stored token");
            return Ok(None);
        };
        self.api.set_token(Some(record.token));
        Ok(Some(address))
    }

    async fn sign_out(&self, address: Option<&Address>) {
        if let Err(e) = self.wallet.disconnect().await {
            tracing::warn!(error = %e, "wallet disconnect failed");
        }
        self.api.set_token(None);
        if let Some(address) = address {
            if let Err(e) = self.with_credentials(|store| store.remove(address)) {
                tracing::warn!(error = %e, "failed to forget credentials");
            }
        }
    }

    async fn clear_cart(&self, item_ids: &[ItemId]) -> Result<()> {
        // All deletes run to completion before the first failure is reported.
        let results = join_all(item_ids.iter().map(|id| self.api.remove_cart_item(*id))).await;
        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            tracing::warn!(failed, total = item_ids.len(), "cart clear partially failed");
        }
        results.into_iter().collect()
    }

    /// Processes a worker message and returns the response for the event loop.
    #[allow(clippy::too_many_lines)]
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);

        async move {
            match message {
                WorkerMessage::LoadCategories => Self::handle_result(
                    "load categories",
                    "Failed to fetch categories",
                    self.api.categories().await,
                    |categories| WorkerResponse::CategoriesLoaded { categories },
                    |message| WorkerResponse::Error { message },
                ),

                WorkerMessage::FetchListing { seq, query } => Self::handle_result(
                    "fetch listing",
                    "Failed to fetch items",
                    self.api.list_items(&query).await,
                    |page| WorkerResponse::ListingLoaded { seq, page },
                    |message| WorkerResponse::ListingFailed { seq, message },
                ),

                WorkerMessage::FetchItem { seq, item_id, offer_page } => {
                    let result = tokio::try_join!(
                        self.api.item(item_id),
                        self.api.item_offers(item_id, offer_page, OFFERS_PER_PAGE),
                    );
                    Self::handle_result(
                        "fetch item",
                        "Failed to fetch item",
                        result,
                        |(item, offers)| WorkerResponse::ItemLoaded { seq, item, offers },
                        |message| WorkerResponse::ViewFailed { seq, message },
                    )
                }

                WorkerMessage::FetchOffers { seq, item_id, page } => Self::handle_result(
                    "fetch offers",
                    "Failed to fetch offers",
                    self.api.item_offers(item_id, page, OFFERS_PER_PAGE).await,
                    |offers| WorkerResponse::OffersLoaded { seq, offers },
                    |message| WorkerResponse::ViewFailed { seq, message },
                ),

                WorkerMessage::FetchAccount { seq, address } => {
                    let result = tokio::try_join!(
                        self.api.user(&address),
                        self.api.user_items(&address),
                        self.api.transactions(&address),
                    );
                    Self::handle_result(
                        "fetch account",
                        "Failed to fetch account",
                        result,
                        |(profile, items, transactions)| WorkerResponse::AccountLoaded {
                            seq,
                            profile,
                            items,
                            transactions,
                        },
                        |message| WorkerResponse::ViewFailed { seq, message },
                    )
                }

                WorkerMessage::FetchCart { seq } => Self::handle_result(
                    "fetch cart",
                    "Failed to fetch cart items",
                    self.api.cart_items().await,
                    |items| WorkerResponse::CartLoaded { seq, items },
                    |message| WorkerResponse::CartLoadFailed { seq, message },
                ),

                WorkerMessage::AddCartItem { mutation_id, item_id } => Self::handle_result(
                    "add cart item",
                    "Failed to add item to cart",
                    self.api.add_cart_item(item_id).await,
                    |()| WorkerResponse::CartMutationSettled { mutation_id, outcome: Ok(()) },
                    |message| WorkerResponse::CartMutationSettled { mutation_id, outcome: Err(message) },
                ),

                WorkerMessage::RemoveCartItem { mutation_id, item_id } => Self::handle_result(
                    "remove cart item",
                    "Failed to remove item",
                    self.api.remove_cart_item(item_id).await,
                    |()| WorkerResponse::CartMutationSettled { mutation_id, outcome: Ok(()) },
                    |message| WorkerResponse::CartMutationSettled { mutation_id, outcome: Err(message) },
                ),

                WorkerMessage::ClearCart { mutation_id, item_ids } => Self::handle_result(
                    "clear cart",
                    "Failed to remove items",
                    self.clear_cart(&item_ids).await,
                    |()| WorkerResponse::CartMutationSettled { mutation_id, outcome: Ok(()) },
                    |message| WorkerResponse::CartMutationSettled { mutation_id, outcome: Err(message) },
                ),

                WorkerMessage::Checkout { mutation_id, purchase } => {
                    tracing::debug!(
                        items = purchase.item_ids.len(),
                        value_wei = %purchase.value_wei,
                        "submitting batch purchase"
                    );
                    Self::handle_result(
                        "checkout",
                        "Failed to place order",
                        self.contract.batch_buy(&purchase).await,
                        |receipt| WorkerResponse::CheckoutSettled { mutation_id, outcome: Ok(receipt) },
                        |message| WorkerResponse::CheckoutSettled { mutation_id, outcome: Err(message) },
                    )
                }

                WorkerMessage::PlaceOffer { item_id, price } => Self::handle_result(
                    "place offer",
                    "Failed to place offer",
                    self.api.place_offer(item_id, price).await,
                    |()| WorkerResponse::OfferPlaced { item_id },
                    |message| WorkerResponse::Error { message },
                ),

                WorkerMessage::UpdateProfile { address, update } => Self::handle_result(
                    "update profile",
                    "Failed to update profile",
                    self.api.update_user(&address, &update).await,
                    |profile| WorkerResponse::ProfileUpdated { profile },
                    |message| WorkerResponse::Error { message },
                ),

                WorkerMessage::CreateItem { draft } => Self::handle_result(
                    "create item",
                    "Failed to create item",
                    self.api.create_item(&draft).await,
                    |()| WorkerResponse::ItemCreated,
                    |message| WorkerResponse::Error { message },
                ),

                WorkerMessage::SignIn => match self.sign_in().await {
                    Ok(address) => WorkerResponse::SignedIn {
                        address,
                        reconnected: false,
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "sign-in failed");
                        WorkerResponse::SignInFailed {
                            message: "Login failed".to_string(),
                        }
                    }
                },

                WorkerMessage::RestoreSession => match self.restore_session().await {
                    Ok(Some(address)) => WorkerResponse::SignedIn {
                        address,
                        reconnected: true,
                    },
                    Ok(None) => WorkerResponse::NoStoredSession,
                    Err(e) => {
                        tracing::warn!(error = %e, "session restore failed");
                        WorkerResponse::NoStoredSession
                    }
                },

                WorkerMessage::SignOut { address } => {
                    self.sign_out(address.as_ref()).await;
                    WorkerResponse::SignedOut
                }

                WorkerMessage::FetchBalance { address } => Self::handle_result(
                    "fetch balance",
                    "Failed to fetch balance",
                    self.contract.balance(&address).await,
                    |balance| WorkerResponse::BalanceLoaded { address, balance },
                    |message| WorkerResponse::Error { message },
                ),
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::MockMarketplaceApi;
    use crate::domain::CartItem;
    use crate::storage::models::CredentialRecord;
    use crate::wallet::{BatchPurchase, MockAuthSession, MockContractClient, TxReceipt};

    const OWNER: &str = "0x1aBA989D0703cE6CC651B6109d02b39a9651aE5d";

    #[derive(Default)]
    struct MemoryStore(std::collections::HashMap<Address, CredentialRecord>);

    impl CredentialStore for MemoryStore {
        fn get(&self, address: &Address) -> Result<Option<CredentialRecord>> {
            Ok(self.0.get(address).cloned())
        }

        fn put(&mut self, record: CredentialRecord) -> Result<()> {
            self.0.insert(record.address.clone(), record);
            Ok(())
        }

        fn remove(&mut self, address: &Address) -> Result<()> {
            self.0.remove(address);
            Ok(())
        }
    }

    fn owner() -> Address {
        Address::parse(OWNER).unwrap()
    }

    fn worker(api: MockMarketplaceApi, wallet: MockAuthSession, contract: MockContractClient) -> DexyWorker {
        DexyWorker::new(
            Arc::new(api),
            Arc::new(wallet),
            Arc::new(contract),
            Box::new(MemoryStore::default()),
            "Sign in to DeXy",
        )
    }

    #[tokio::test]
    async fn clear_cart_fails_if_any_delete_fails() {
        let mut api = MockMarketplaceApi::new();
        api.expect_remove_cart_item()
            .with(eq(ItemId(1)))
            .returning(|_| Ok(()));
        api.expect_remove_cart_item()
            .with(eq(ItemId(2)))
            .returning(|_| Err(DexyError::Api { status: 500, detail: None }));

        let worker = worker(api, MockAuthSession::new(), MockContractClient::new());
        let response = worker
            .handle_message(WorkerMessage::ClearCart {
                mutation_id: 3,
                item_ids: vec![ItemId(1), ItemId(2)],
            })
            .await;

        assert_eq!(
            response,
            WorkerResponse::CartMutationSettled {
                mutation_id: 3,
                outcome: Err("Failed to remove items".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn clear_cart_issues_every_delete_when_one_fails() {
        let mut api = MockMarketplaceApi::new();
        api.expect_remove_cart_item()
            .with(eq(ItemId(1)))
            .times(1)
            .returning(|_| Err(DexyError::Api { status: 500, detail: None }));
        api.expect_remove_cart_item()
            .with(eq(ItemId(2)))
            .times(1)
            .returning(|_| Ok(()));
        api.expect_remove_cart_item()
            .with(eq(ItemId(3)))
            .times(1)
            .returning(|_| Ok(()));

        let worker = worker(api, MockAuthSession::new(), MockContractClient::new());
        let response = worker
            .handle_message(WorkerMessage::ClearCart {
                mutation_id: 4,
                item_ids: vec![ItemId(1), ItemId(2), ItemId(3)],
            })
            .await;

        assert_eq!(
            response,
            WorkerResponse::CartMutationSettled {
                mutation_id: 4,
                outcome: Err("Failed to remove items".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn server_detail_is_surfaced_on_remove() {
        let mut api = MockMarketplaceApi::new();
        api.expect_remove_cart_item().returning(|_| {
            Err(DexyError::Api {
                status: 404,
                detail: Some("Item not in cart".to_string()),
            })
        });

        let worker = worker(api, MockAuthSession::new(), MockContractClient::new());
        let response = worker
            .handle_message(WorkerMessage::RemoveCartItem {
                mutation_id: 1,
                item_id: ItemId(4),
            })
            .await;

        assert_eq!(
            response,
            WorkerResponse::CartMutationSettled {
                mutation_id: 1,
                outcome: Err("Item not in cart".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn sign_in_stores_token_and_restore_reuses_it() {
        let mut api = MockMarketplaceApi::new();
        api.expect_login()
            .withf(|address, message, signature| {
                address.as_str() == OWNER.to_lowercase() && message == "Sign in to DeXy" && signature == "0xsig"
            })
            .times(1)
            .returning(|_, _, _| Ok("token-1".to_string()));
        api.expect_set_token()
            .with(eq(Some("token-1".to_string())))
            .times(2)
            .return_const(());

        let mut wallet = MockAuthSession::new();
        wallet.expect_connect().times(1).returning(|| Ok(owner()));
        wallet
            .expect_sign_challenge()
            .times(1)
            .returning(|_| Ok("0xsig".to_string()));
        wallet.expect_account().times(1).returning(|| Ok(Some(owner())));

        let worker = worker(api, wallet, MockContractClient::new());

        let response = worker.handle_message(WorkerMessage::SignIn).await;
        assert_eq!(
            response,
            WorkerResponse::SignedIn {
                address: owner(),
                reconnected: false
            }
        );

        let response = worker.handle_message(WorkerMessage::RestoreSession).await;
        assert_eq!(
            response,
            WorkerResponse::SignedIn {
                address: owner(),
                reconnected: true
            }
        );
    }

    #[tokio::test]
    async fn rejected_signature_fails_login() {
        let mut wallet = MockAuthSession::new();
        wallet.expect_connect().returning(|| Ok(owner()));
        wallet
            .expect_sign_challenge()
            .returning(|_| Err(DexyError::Wallet("user rejected".to_string())));

        let worker = worker(MockMarketplaceApi::new(), wallet, MockContractClient::new());
        let response = worker.handle_message(WorkerMessage::SignIn).await;

        assert_eq!(
            response,
            WorkerResponse::SignInFailed {
                message: "Login failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn checkout_passes_purchase_to_contract() {
        let line = CartItem {
            item_id: ItemId(7),
            owner_address: owner(),
            display_name: "Doge".to_string(),
            image_ref: String::new(),
            unit_price: Decimal::from_str("0.5").unwrap(),
        };
        let purchase = BatchPurchase::from_cart(&[line]).unwrap();

        let mut contract = MockContractClient::new();
        contract
            .expect_batch_buy()
            .withf(|p| p.value_wei == 500_000_000_000_000_000 && p.item_ids == vec![ItemId(7)])
            .returning(|_| Ok(TxReceipt { tx_hash: "0xabc".to_string() }));

        let worker = worker(MockMarketplaceApi::new(), MockAuthSession::new(), contract);
        let response = worker
            .handle_message(WorkerMessage::Checkout { mutation_id: 9, purchase })
            .await;

        assert_eq!(
            response,
            WorkerResponse::CheckoutSettled {
                mutation_id: 9,
                outcome: Ok(TxReceipt { tx_hash: "0xabc".to_string() }),
            }
        );
    }
}
