//! JSON file-based credential store.
//!
//! Uses atomic file writes (write-to-temp + rename) so a crash never leaves a
//! half-written credentials file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "credentials": {
//!     "0x1aba989d0703ce6cc651b6109d02b39a9651ae5d": {
//!       "address": "0x1aba989d0703ce6cc651b6109d02b39a9651ae5d",
//!       "token": "eyJhbGciOi...",
//!       "issued_at": 1760000000
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DexyError, Result};
use crate::domain::Address;
use crate::storage::backend::CredentialStore;
use crate::storage::models::CredentialRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    version: u32,
    #[serde(default)]
    credentials: BTreeMap<String, CredentialRecord>,
}

impl Default for CredentialFile {
    fn default() -> Self {
        Self {
            version: 1,
            credentials: BTreeMap::new(),
        }
    }
}

/// Credential store backed by a single JSON file.
///
/// The whole file is held in memory and rewritten on every change.
pub struct JsonCredentialStore {
    file_path: PathBuf,
    data: CredentialFile,
    dirty: bool,
}

impl JsonCredentialStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or an existing
    /// file cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dexy::storage::JsonCredentialStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonCredentialStore::new(PathBuf::from("/tmp/dexy/credentials.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening credential store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            CredentialFile::default()
        };

        tracing::debug!(credentials = data.credentials.len(), "credential store opened");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<CredentialFile> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| DexyError::Storage(format!("failed to parse credentials: {e}")))
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| DexyError::Storage(format!("failed to serialize credentials: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "credentials saved");
        Ok(())
    }
}

impl CredentialStore for JsonCredentialStore {
    fn get(&self, address: &Address) -> Result<Option<CredentialRecord>> {
        Ok(self.data.credentials.get(address.as_str()).cloned())
    }

    fn put(&mut self, record: CredentialRecord) -> Result<()> {
        let _span = tracing::debug_span!("credentials_put", address = %record.address).entered();

        self.data
            .credentials
            .insert(record.address.as_str().to_string(), record);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, address: &Address) -> Result<()> {
        let _span = tracing::debug_span!("credentials_remove", address = %address).entered();

        if self.data.credentials.remove(address.as_str()).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonCredentialStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save credentials on drop");
            }
        }
    }
}
