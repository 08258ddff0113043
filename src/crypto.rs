//! Cryptographic primitives
//!
//! Narrow wrappers around HMAC-SHA512, PBKDF2-HMAC-SHA512 and the secp256k1
//! scalar range check. Key derivation only talks to the curve and hash
//! libraries through this module.

use hmac::{Hmac, Mac};
use sha2::Sha512;

/// HMAC-SHA512 type alias used by seed and master key derivation
type HmacSha512 = Hmac<Sha512>;

/// Length of a BIP39 seed and of an HMAC-SHA512 output
pub const SEED_LEN: usize = 64;

/// Length of a serialized secp256k1 secret scalar
pub const SECRET_KEY_LEN: usize = 32;

/// Primitive errors
///
/// HMAC accepts keys of any length (longer keys are hashed first), so the
/// current `hmac` crate never produces `HmacKey`. The variant carries the
/// error type of the fallible `new_from_slice` constructor.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("HMAC key initialization failed: {0}")]
    HmacKey(String),
}

/// Compute HMAC-SHA512 over `data` keyed with `key`
///
/// Keys of any length are accepted, including empty keys and keys longer
/// than the 128-byte SHA-512 block.
///
/// # Returns
///
/// The full 64-byte MAC
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; SEED_LEN], CryptoError> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| CryptoError::HmacKey(e.to_string()))?;
    mac.update(data);

    let mut output = [0u8; SEED_LEN];
    output.copy_from_slice(&mac.finalize().into_bytes());
    Ok(output)
}

/// Derive 64 bytes with PBKDF2 using HMAC-SHA512 as the PRF
///
/// # Arguments
///
/// * `password` - Password bytes (for BIP39, the normalized mnemonic)
/// * `salt` - Salt bytes (for BIP39, `"mnemonic"` followed by the passphrase)
/// * `rounds` - Iteration count
pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8], rounds: u32) -> [u8; SEED_LEN] {
    let mut output = [0u8; SEED_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, &mut output);
    output
}

/// Check that `bytes` is a usable secp256k1 secret key, i.e. `0 < k < n`
pub fn is_valid_secret_scalar(bytes: &[u8; SECRET_KEY_LEN]) -> bool {
    secp256k1::SecretKey::from_slice(bytes).is_ok()
}
