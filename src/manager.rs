//! Wallet manager - Main integration layer
//!
//! Couples the derivation engine with a wallet store: create-and-save,
//! import-and-save, and load-on-startup.

use crate::config::{ConfigError, WalletConfig};
use crate::engine::{self, DerivationError};
use crate::storage::{EncryptedFileMedium, MediumError, SecureMedium, StoreError, WalletStore};
use crate::types::{StoredWallet, WalletSnapshot};

/// Errors that can occur in the wallet manager
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Medium error: {0}")]
    Medium(#[from] MediumError),
}

/// Main wallet manager
///
/// Every operation is a plain request/result call; callers keep whatever
/// presentation state they need.
pub struct WalletManager<M> {
    store: WalletStore<M>,
}

impl WalletManager<EncryptedFileMedium> {
    /// Create a manager over the encrypted file store described by `config`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = load_config(None, ConfigOverrides::new())?;
    /// let mut manager = WalletManager::open_encrypted(&config, "passphrase")?;
    /// let saved = manager.load_saved_wallet()?;
    /// ```
    pub fn open_encrypted(config: &WalletConfig, passphrase: &str) -> Result<Self, ManagerError> {
        config.validate()?;
        let path = config.store_path()?;
        let medium = EncryptedFileMedium::open(path, passphrase, config.kdf_iterations)?;
        Ok(Self::new(medium))
    }
}

impl<M: SecureMedium> WalletManager<M> {
    pub fn new(medium: M) -> Self {
        Self {
            store: WalletStore::new(medium),
        }
    }

    pub fn store(&self) -> &WalletStore<M> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WalletStore<M> {
        &mut self.store
    }

    /// Generate a new wallet and persist it
    pub fn create_wallet(&mut self) -> Result<WalletSnapshot, ManagerError> {
        let snapshot = engine::generate()?;
        self.store.save(&snapshot)?;
        Ok(snapshot)
    }

    /// Import a wallet from a recovery phrase and persist it
    ///
    /// Nothing is written if the phrase is rejected.
    pub fn import_wallet(&mut self, phrase: &str) -> Result<WalletSnapshot, ManagerError> {
        let snapshot = engine::import_wallet(phrase)?;
        self.store.save(&snapshot)?;
        Ok(snapshot)
    }

    /// Load the previously saved wallet, if any
    pub fn load_saved_wallet(&self) -> Result<Option<StoredWallet>, ManagerError> {
        Ok(self.store.load()?)
    }
}
