//! Storage layer for wallet data
//!
//! The wallet store and the encrypted media it can persist through.

pub mod encrypted_file;
pub mod medium;
pub mod memory;
pub mod store;

pub use encrypted_file::EncryptedFileMedium;
pub use medium::{MediumError, MediumValue, SecureMedium, WriteBatch};
pub use memory::MemoryMedium;
pub use store::{StoreError, WalletStore};
