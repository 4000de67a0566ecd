//! Wallet layer: account connection, message signing and the purchase contract.
//!
//! - [`session`]: [`AuthSession`] and [`ContractClient`] capabilities
//! - [`purchase`]: `batchBuy` argument building with exact ether-to-wei conversion
//! - [`bridge`]: HTTP implementation of both capabilities

pub mod bridge;
pub mod purchase;
pub mod session;

pub use bridge::HttpWalletBridge;
pub use purchase::{parse_ether, BatchPurchase};
pub use session::{AuthSession, ContractClient, MockAuthSession, MockContractClient, TxReceipt};
