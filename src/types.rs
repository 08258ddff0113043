//! Shared types for mnemonic-wallet
//!
//! Values passed between the derivation engine, the wallet store and callers.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Number of words in every mnemonic handled by this crate
pub const MNEMONIC_WORD_COUNT: usize = 12;

/// Wallet key material produced by the derivation engine
///
/// Built fresh on every generate/import call and never mutated afterwards.
/// `Debug` output redacts both fields.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletSnapshot {
    mnemonic_words: Vec<String>,
    private_key_hex: String,
}

impl WalletSnapshot {
    /// Create a snapshot from already-validated parts
    pub fn new(mnemonic_words: Vec<String>, private_key_hex: String) -> Self {
        Self {
            mnemonic_words,
            private_key_hex,
        }
    }

    /// Ordered mnemonic words
    pub fn mnemonic_words(&self) -> &[String] {
        &self.mnemonic_words
    }

    /// Mnemonic words joined by single spaces
    pub fn phrase(&self) -> String {
        self.mnemonic_words.join(" ")
    }

    /// Master private key as 64 lowercase hex characters
    pub fn private_key_hex(&self) -> &str {
        &self.private_key_hex
    }
}

impl fmt::Debug for WalletSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSnapshot")
            .field("mnemonic_words", &format_args!("<{} words>", self.mnemonic_words.len()))
            .field("private_key_hex", &format_args!("<redacted>"))
            .finish()
    }
}

/// A persisted snapshot together with the time it was saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWallet {
    pub snapshot: WalletSnapshot,

    /// Milliseconds since the Unix epoch, captured at save time
    pub saved_at_millis: i64,
}

impl StoredWallet {
    /// Save time as a UTC timestamp
    ///
    /// Returns `None` if the stored value is outside chrono's range.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.saved_at_millis).single()
    }

    /// Save time formatted for display (`yyyy-MM-dd HH:mm`, local time)
    pub fn saved_at_display(&self) -> Option<String> {
        self.saved_at()
            .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
    }
}
