//! Wallet store
//!
//! Persists a [`WalletSnapshot`] and its save time as three fields of a
//! [`SecureMedium`]. There is one record per medium and every save
//! replaces it.

use chrono::Utc;

use super::medium::{MediumError, SecureMedium, WriteBatch};
use crate::types::{StoredWallet, WalletSnapshot, MNEMONIC_WORD_COUNT};

/// Space-joined mnemonic words
pub const KEY_MNEMONIC: &str = "mnemonic_words";

/// Master private key, 64 lowercase hex characters
pub const KEY_PRIVATE_KEY: &str = "private_key_hex";

/// Save time, milliseconds since the Unix epoch
pub const KEY_SAVED_AT: &str = "saved_at";

/// Wallet store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage write failed: {0}")]
    Write(#[source] MediumError),

    #[error("Storage read failed: {0}")]
    Read(#[source] MediumError),
}

/// Wallet persistence over an explicitly supplied medium
///
/// Performs no locking. `save` takes `&mut self`, so a single handle cannot
/// interleave saves; callers sharing one backing store across handles must
/// serialize them.
pub struct WalletStore<M> {
    medium: M,
}

impl<M: SecureMedium> WalletStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Save a snapshot, replacing any previous one
    ///
    /// All three fields are committed in one batch, with the timestamp
    /// captured here.
    ///
    /// # Errors
    ///
    /// [`StoreError::Write`] if the medium rejects the batch; no field is
    /// updated in that case.
    pub fn save(&mut self, snapshot: &WalletSnapshot) -> Result<(), StoreError> {
        let saved_at = Utc::now().timestamp_millis();

        let mut batch = WriteBatch::new();
        batch
            .put(KEY_MNEMONIC, snapshot.phrase())
            .put(KEY_PRIVATE_KEY, snapshot.private_key_hex())
            .put(KEY_SAVED_AT, saved_at);

        self.medium.commit(batch).map_err(StoreError::Write)?;

        log::info!("Wallet saved");
        log::debug!("  Saved at: {} ms", saved_at);
        Ok(())
    }

    /// Load the last saved snapshot
    ///
    /// Returns `Ok(None)` when nothing was saved yet, and also when the
    /// stored mnemonic does not split into exactly 12 words. Both cases are
    /// an empty store from the caller's point of view.
    ///
    /// # Errors
    ///
    /// [`StoreError::Read`] only on medium failure, never for missing keys.
    /// All three fields come from a single [`SecureMedium::get_many`] read.
    pub fn load(&self) -> Result<Option<StoredWallet>, StoreError> {
        let mut fields = self
            .medium
            .get_many(&[KEY_MNEMONIC, KEY_PRIVATE_KEY, KEY_SAVED_AT])
            .map_err(StoreError::Read)?
            .into_iter();
        let mnemonic = fields.next().flatten();
        let private_key = fields.next().flatten();
        let saved_at = fields.next().flatten();

        let (mnemonic, private_key) = match (mnemonic, private_key) {
            (Some(mnemonic), Some(private_key)) => (mnemonic, private_key),
            _ => {
                log::debug!("No saved wallet");
                return Ok(None);
            }
        };

        let (mnemonic, private_key) = match (mnemonic.as_text(), private_key.as_text()) {
            (Some(mnemonic), Some(private_key)) => (mnemonic, private_key.to_string()),
            _ => {
                log::warn!("Saved wallet fields have unexpected types, treating as absent");
                return Ok(None);
            }
        };

        let words: Vec<String> = mnemonic
            .split(' ')
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
        if words.len() != MNEMONIC_WORD_COUNT {
            log::warn!(
                "Saved mnemonic has {} words (expected {}), treating as absent",
                words.len(),
                MNEMONIC_WORD_COUNT
            );
            return Ok(None);
        }

        let saved_at_millis = saved_at.and_then(|value| value.as_integer()).unwrap_or(0);

        log::info!("Loaded saved wallet");
        Ok(Some(StoredWallet {
            snapshot: WalletSnapshot::new(words, private_key),
            saved_at_millis,
        }))
    }
}
