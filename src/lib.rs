//! Mnemonic Wallet
//!
//! Deterministic wallet key derivation (BIP39 mnemonic → BIP32 master key)
//! with encrypted persistence of the resulting secret.

pub mod config;
pub mod crypto;
pub mod engine;
pub mod manager;
pub mod storage;
pub mod types;

pub use engine::{generate, import_wallet, DerivationError, MnemonicFault};
pub use manager::{ManagerError, WalletManager};
pub use storage::{StoreError, WalletStore};
pub use types::{StoredWallet, WalletSnapshot};
