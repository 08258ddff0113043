//! BIP39 mnemonic encoding and validation
//!
//! Wordlist lookup and checksum handling come from the `bip39` crate
//! (English wordlist only). Phrase normalization is done here so that any
//! casing or spacing of the same phrase validates and derives identically.

use bip39::{Language, Mnemonic};

use super::{DerivationError, MnemonicFault};
use crate::types::MNEMONIC_WORD_COUNT;

/// Entropy size for a 12-word mnemonic (128 bits)
pub const ENTROPY_LEN: usize = 16;

/// Normalize a free-form phrase into mnemonic tokens
///
/// Trims, lowercases and splits on runs of whitespace, which leaves no empty
/// tokens. No validation happens here.
pub fn normalize_phrase(phrase: &str) -> Vec<String> {
    phrase
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Encode 128 bits of entropy as 12 checksummed English words
pub fn entropy_to_words(entropy: &[u8; ENTROPY_LEN]) -> Result<Vec<String>, DerivationError> {
    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| DerivationError::InvalidMnemonic(MnemonicFault::Malformed(e.to_string())))?;

    Ok(split_mnemonic(&mnemonic))
}

/// Validate normalized mnemonic tokens
///
/// Checks the word count first, then wordlist membership and the 4-bit
/// checksum. Tokens are expected to come from [`normalize_phrase`].
///
/// # Errors
///
/// - [`DerivationError::WordCount`] unless exactly 12 tokens are given
/// - [`DerivationError::InvalidMnemonic`] on an unknown word or bad checksum
pub fn validate_words(words: &[String]) -> Result<(), DerivationError> {
    if words.len() != MNEMONIC_WORD_COUNT {
        return Err(DerivationError::WordCount {
            expected: MNEMONIC_WORD_COUNT,
            actual: words.len(),
        });
    }

    // Report the first unknown word by position before asking bip39 for the
    // checksum, so the caller can point at it.
    let language = Language::English;
    if let Some(index) = words
        .iter()
        .position(|word| language.find_word(word).is_none())
    {
        return Err(DerivationError::InvalidMnemonic(MnemonicFault::UnknownWord {
            position: index + 1,
        }));
    }

    let phrase = words.join(" ");
    Mnemonic::parse_in_normalized(language, &phrase)
        .map(|_| ())
        .map_err(|e| DerivationError::InvalidMnemonic(map_bip39_error(e)))
}

fn split_mnemonic(mnemonic: &Mnemonic) -> Vec<String> {
    mnemonic
        .to_string()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn map_bip39_error(error: bip39::Error) -> MnemonicFault {
    match error {
        bip39::Error::UnknownWord(index) => MnemonicFault::UnknownWord {
            position: index + 1,
        },
        bip39::Error::InvalidChecksum => MnemonicFault::ChecksumMismatch,
        other => MnemonicFault::Malformed(other.to_string()),
    }
}
