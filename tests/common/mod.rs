//! Common test utilities for mnemonic-wallet integration tests
//!
//! Provides:
//! - Logger setup for RUST_LOG output during tests
//! - Known-answer mnemonic vectors
//! - A medium that fails on demand
//! - Temporary store directories with automatic cleanup

#![allow(dead_code)]

use std::path::PathBuf;

use mnemonic_wallet::storage::{MediumError, MediumValue, MemoryMedium, SecureMedium, WriteBatch};
use tempfile::TempDir;

/// BIP39 vector for all-zero 128-bit entropy
pub const ABANDON_ABOUT: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Master private key derived from [`ABANDON_ABOUT`] with an empty passphrase
pub const ABANDON_ABOUT_KEY: &str =
    "1837c1be8e2995ec11cda2b066151be2cfb48adf9e47b151d46adab3a21cdf67";

/// BIP39 vector for 0x7f-filled entropy
pub const LEGAL_WINNER: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";

pub const LEGAL_WINNER_KEY: &str =
    "7e56ecf5943d79e1f5f87e11c768253d7f3fcf30ae71335611e366c578b4564e";

/// Low iteration count so encrypted-store tests stay fast
pub const TEST_KDF_ITERATIONS: u32 = 1_000;

/// Initialize env_logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Split a phrase into owned words
pub fn words(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_string).collect()
}

/// Medium wrapper whose reads and writes can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyMedium {
    pub inner: MemoryMedium,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FlakyMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureMedium for FlakyMedium {
    fn get(&self, key: &str) -> Result<Option<MediumValue>, MediumError> {
        if self.fail_reads {
            return Err(MediumError::Decryption("simulated keystore failure".to_string()));
        }
        self.inner.get(key)
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), MediumError> {
        if self.fail_writes {
            return Err(MediumError::Unavailable("simulated disk full".to_string()));
        }
        self.inner.commit(batch)
    }
}

/// Test environment with automatic cleanup
pub struct TestStoreEnv {
    _temp_dir: TempDir,
    pub store_dir: PathBuf,
}

impl TestStoreEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store_dir = temp_dir.path().join("store");

        Self {
            _temp_dir: temp_dir,
            store_dir,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_dir.join("wallet_secure_store.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.store_dir.join("config.json")
    }
}
