//! Seed and master key derivation
//!
//! BIP39 seed: PBKDF2-HMAC-SHA512 over the space-joined words, salt
//! `"mnemonic"` (empty passphrase), 2048 rounds.
//!
//! BIP32 master key: left half of HMAC-SHA512 keyed with `"Bitcoin seed"`
//! over the seed. The chain code (right half) is discarded since no child
//! keys are derived.

use zeroize::Zeroizing;

use super::DerivationError;
use crate::crypto::{self, SECRET_KEY_LEN, SEED_LEN};
use crate::types::WalletSnapshot;

/// PBKDF2 iteration count fixed by BIP39
pub const SEED_ROUNDS: u32 = 2048;

/// Salt prefix fixed by BIP39; the (always empty) passphrase follows it
const SEED_SALT: &[u8] = b"mnemonic";

/// HMAC key for master key generation per BIP32
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Derive the 64-byte BIP39 seed from normalized mnemonic words
pub fn mnemonic_to_seed(words: &[String]) -> Zeroizing<[u8; SEED_LEN]> {
    let phrase = Zeroizing::new(words.join(" "));
    Zeroizing::new(crypto::pbkdf2_hmac_sha512(
        phrase.as_bytes(),
        SEED_SALT,
        SEED_ROUNDS,
    ))
}

/// Derive the BIP32 master private key from a seed
///
/// # Errors
///
/// [`DerivationError::InvalidMasterKey`] if the left half of the HMAC output
/// is zero or not below the secp256k1 group order.
pub fn master_key_from_seed(
    seed: &[u8; SEED_LEN],
) -> Result<Zeroizing<[u8; SECRET_KEY_LEN]>, DerivationError> {
    let i = Zeroizing::new(crypto::hmac_sha512(MASTER_HMAC_KEY, seed)?);

    let mut key = Zeroizing::new([0u8; SECRET_KEY_LEN]);
    key.copy_from_slice(&i[..SECRET_KEY_LEN]);

    if !crypto::is_valid_secret_scalar(&key) {
        return Err(DerivationError::InvalidMasterKey);
    }

    Ok(key)
}

/// Build a snapshot from validated, normalized mnemonic words
///
/// The key is rendered as exactly 64 lowercase hex characters (`hex`
/// encodes every byte as two digits, so leading zero bytes are kept).
pub fn derive_snapshot(words: Vec<String>) -> Result<WalletSnapshot, DerivationError> {
    let seed = mnemonic_to_seed(&words);
    let master_key = master_key_from_seed(&seed)?;

    Ok(WalletSnapshot::new(words, hex::encode(&master_key[..])))
}
