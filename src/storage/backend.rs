//! Credential store abstraction.

use crate::domain::error::Result;
use crate::domain::Address;
use crate::storage::models::CredentialRecord;

/// Persistent map from wallet address to its most recent bearer token.
///
/// # Implementations
///
/// - [`crate::storage::JsonCredentialStore`]: JSON file with atomic writes
pub trait CredentialStore: Send {
    /// Token previously issued to `address`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get(&self, address: &Address) -> Result<Option<CredentialRecord>>;

    /// Stores `record`, replacing any earlier token for the same address.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn put(&mut self, record: CredentialRecord) -> Result<()>;

    /// Forgets the token of `address`. Removing an unknown address is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn remove(&mut self, address: &Address) -> Result<()>;
}
