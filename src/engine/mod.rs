//! Mnemonic/key derivation engine
//!
//! Stateless conversions entropy → mnemonic → seed → master private key.
//! Only [`generate`] touches the outside world, and only to draw entropy.

pub mod keys;
pub mod mnemonic;

pub use keys::{derive_snapshot, master_key_from_seed, mnemonic_to_seed, SEED_ROUNDS};
pub use mnemonic::{entropy_to_words, normalize_phrase, validate_words, ENTROPY_LEN};

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::CryptoError;
use crate::types::WalletSnapshot;

/// Attempts before `generate` gives up on out-of-range master keys
pub const MAX_GENERATE_ATTEMPTS: usize = 16;

/// Key derivation errors
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("Seed phrase must contain exactly {expected} words, got {actual}")]
    WordCount { expected: usize, actual: usize },

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(MnemonicFault),

    #[error("Derived master key is outside the secp256k1 scalar range")]
    InvalidMasterKey,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Why a 12-word phrase was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MnemonicFault {
    /// 1-based position of the first word missing from the wordlist
    #[error("word {position} is not in the BIP39 English wordlist")]
    UnknownWord { position: usize },

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("{0}")]
    Malformed(String),
}

/// Generate a new wallet from OS entropy
///
/// # Example
///
/// ```ignore
/// let snapshot = mnemonic_wallet::engine::generate()?;
/// assert_eq!(snapshot.mnemonic_words().len(), 12);
/// ```
pub fn generate() -> Result<WalletSnapshot, DerivationError> {
    generate_with_rng(&mut OsRng)
}

/// Generate a new wallet drawing 16 bytes per attempt from `rng`
///
/// A master key outside `[1, n-1]` is never returned; fresh entropy is drawn
/// instead, up to [`MAX_GENERATE_ATTEMPTS`] times.
///
/// # Errors
///
/// - [`DerivationError::RandomSource`] if `rng` fails (not retried)
/// - [`DerivationError::InvalidMasterKey`] if every attempt was out of range
pub fn generate_with_rng<R>(rng: &mut R) -> Result<WalletSnapshot, DerivationError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    generate_with(rng, derive_snapshot)
}

/// Retry loop behind [`generate_with_rng`], with the derivation step passed in
fn generate_with<R, F>(rng: &mut R, mut derive: F) -> Result<WalletSnapshot, DerivationError>
where
    R: RngCore + CryptoRng + ?Sized,
    F: FnMut(Vec<String>) -> Result<WalletSnapshot, DerivationError>,
{
    for attempt in 1..=MAX_GENERATE_ATTEMPTS {
        let mut entropy = Zeroizing::new([0u8; ENTROPY_LEN]);
        rng.try_fill_bytes(entropy.as_mut_slice())
            .map_err(|e| DerivationError::RandomSource(e.to_string()))?;

        let words = entropy_to_words(&entropy)?;
        match derive(words) {
            Ok(snapshot) => {
                log::info!("Generated new wallet");
                return Ok(snapshot);
            }
            Err(DerivationError::InvalidMasterKey) => {
                log::warn!(
                    "Master key out of range on attempt {}/{}, drawing fresh entropy",
                    attempt,
                    MAX_GENERATE_ATTEMPTS
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(DerivationError::InvalidMasterKey)
}

/// Import a wallet from a user-supplied recovery phrase
///
/// The phrase is normalized with [`normalize_phrase`] before validation, so
/// any casing or spacing of a valid phrase yields the same snapshot.
///
/// # Errors
///
/// - [`DerivationError::WordCount`] unless exactly 12 words remain
/// - [`DerivationError::InvalidMnemonic`] on an unknown word or bad checksum
///
/// # Example
///
/// ```ignore
/// let snapshot = import_wallet("  ABANDON abandon ... about ")?;
/// ```
pub fn import_wallet(phrase: &str) -> Result<WalletSnapshot, DerivationError> {
    let words = normalize_phrase(phrase);
    if let Err(e) = validate_words(&words) {
        log::debug!("Rejected import phrase: {}", e);
        return Err(e);
    }

    let snapshot = derive_snapshot(words)?;
    log::info!("Imported wallet from recovery phrase");
    Ok(snapshot)
}
