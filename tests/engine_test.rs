//! Integration tests for the derivation engine
//!
//! Tests mnemonic generation, phrase normalization and validation, and
//! seed/master key derivation against BIP39 and BIP32 vectors.

mod common;

use bip39::{Language, Mnemonic};
use mnemonic_wallet::engine::{
    derive_snapshot, entropy_to_words, generate, generate_with_rng, import_wallet,
    master_key_from_seed, mnemonic_to_seed, normalize_phrase, validate_words, DerivationError,
    MnemonicFault,
};
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

use common::{init_logging, words, ABANDON_ABOUT, ABANDON_ABOUT_KEY, LEGAL_WINNER, LEGAL_WINNER_KEY};

/// Entropy source that is permanently offline
struct OfflineRng;

impl RngCore for OfflineRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy source offline",
        )))
    }
}

impl CryptoRng for OfflineRng {}

/// Entropy source that always yields zero bytes
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ZeroRng {}

fn assert_lower_hex_64(key: &str) {
    assert_eq!(key.len(), 64, "Private key should be 64 hex characters");
    assert!(
        key.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')),
        "Private key should be lowercase hex: {}",
        key
    );
}

#[test]
fn test_generate_produces_valid_12_word_mnemonics() {
    init_logging();

    let wallet1 = generate().expect("Failed to generate wallet");
    let wallet2 = generate().expect("Failed to generate second wallet");

    for wallet in [&wallet1, &wallet2] {
        assert_eq!(wallet.mnemonic_words().len(), 12, "Mnemonic should have 12 words");
        for word in wallet.mnemonic_words() {
            assert!(
                Language::English.find_word(word).is_some(),
                "Generated word should be in the wordlist"
            );
        }

        let parsed = Mnemonic::parse_in_normalized(Language::English, &wallet.phrase())
            .expect("Generated mnemonic should pass the BIP39 checksum");
        assert_eq!(parsed.to_entropy().len(), 16, "12 words should carry 128 bits of entropy");

        assert_lower_hex_64(wallet.private_key_hex());
    }

    assert_ne!(wallet1.phrase(), wallet2.phrase(), "Generated mnemonics should be unique");
    assert_ne!(wallet1.private_key_hex(), wallet2.private_key_hex());
}

#[test]
fn test_generated_wallet_reimports_to_same_snapshot() {
    let generated = generate().expect("Failed to generate wallet");
    let imported = import_wallet(&generated.phrase()).expect("Generated phrase should import");

    assert_eq!(generated, imported, "Import of a generated phrase should round-trip");
}

#[test]
fn test_generate_with_zero_entropy_yields_abandon_about() {
    let wallet = generate_with_rng(&mut ZeroRng).expect("Failed to generate from zero entropy");

    assert_eq!(wallet.phrase(), ABANDON_ABOUT);
    assert_eq!(wallet.private_key_hex(), ABANDON_ABOUT_KEY);
}

#[test]
fn test_generate_with_seeded_rng_is_deterministic() {
    let a = generate_with_rng(&mut StdRng::seed_from_u64(42)).expect("Generation failed");
    let b = generate_with_rng(&mut StdRng::seed_from_u64(42)).expect("Generation failed");
    let c = generate_with_rng(&mut StdRng::seed_from_u64(43)).expect("Generation failed");

    assert_eq!(a, b, "Same entropy should yield the same wallet");
    assert_ne!(a, c, "Different entropy should yield a different wallet");
}

#[test]
fn test_generate_reports_random_source_failure() {
    let result = generate_with_rng(&mut OfflineRng);

    match result {
        Err(DerivationError::RandomSource(msg)) => {
            assert!(msg.contains("offline"), "Error should carry the source failure: {}", msg)
        }
        other => panic!("Expected RandomSource error, got {:?}", other),
    }
}

#[test]
fn test_import_known_vector_abandon_about() {
    init_logging();

    let wallet = import_wallet(ABANDON_ABOUT).expect("Known vector should import");

    assert_eq!(wallet.mnemonic_words(), words(ABANDON_ABOUT).as_slice());
    assert_eq!(wallet.private_key_hex(), ABANDON_ABOUT_KEY);
}

#[test]
fn test_import_known_vector_legal_winner() {
    let wallet = import_wallet(LEGAL_WINNER).expect("Known vector should import");
    assert_eq!(wallet.private_key_hex(), LEGAL_WINNER_KEY);
}

#[test]
fn test_import_is_case_and_whitespace_insensitive() {
    let canonical = import_wallet(ABANDON_ABOUT).expect("Canonical phrase should import");

    let variants = [
        ABANDON_ABOUT.to_uppercase(),
        format!("   {}   ", ABANDON_ABOUT),
        ABANDON_ABOUT.replace(' ', " \t\n "),
        "Abandon ABANDON abandon AbAnDoN abandon abandon\nabandon abandon abandon abandon abandon About"
            .to_string(),
    ];

    for variant in variants {
        let wallet = import_wallet(&variant).expect("Variant should import");
        assert_eq!(wallet, canonical, "Variant {:?} should derive the same wallet", variant);
    }
}

#[test]
fn test_import_rejects_wrong_word_count() {
    match import_wallet("abandon abandon abandon") {
        Err(DerivationError::WordCount { expected, actual }) => {
            assert_eq!(expected, 12);
            assert_eq!(actual, 3);
        }
        other => panic!("Expected WordCount error, got {:?}", other),
    }

    let thirteen = format!("{} abandon", ABANDON_ABOUT);
    assert!(matches!(
        import_wallet(&thirteen),
        Err(DerivationError::WordCount { actual: 13, .. })
    ));

    assert!(matches!(
        import_wallet("   \n\t "),
        Err(DerivationError::WordCount { actual: 0, .. })
    ));
}

#[test]
fn test_import_rejects_unknown_word_with_position() {
    let phrase = ABANDON_ABOUT.replacen("abandon", "notaword", 1);

    match import_wallet(&phrase) {
        Err(DerivationError::InvalidMnemonic(MnemonicFault::UnknownWord { position })) => {
            assert_eq!(position, 1, "First word is the unknown one");
        }
        other => panic!("Expected UnknownWord, got {:?}", other),
    }

    let last_bad = ABANDON_ABOUT.replace("about", "abouts");
    assert!(matches!(
        import_wallet(&last_bad),
        Err(DerivationError::InvalidMnemonic(MnemonicFault::UnknownWord { position: 12 }))
    ));
}

#[test]
fn test_import_rejects_checksum_mismatch() {
    let phrase = vec!["abandon"; 12].join(" ");

    match import_wallet(&phrase) {
        Err(DerivationError::InvalidMnemonic(MnemonicFault::ChecksumMismatch)) => {}
        other => panic!("Expected ChecksumMismatch, got {:?}", other),
    }
}

#[test]
fn test_validation_errors_are_distinguishable_in_messages() {
    let count = import_wallet("abandon").unwrap_err().to_string();
    let unknown = import_wallet(&ABANDON_ABOUT.replace("about", "zzzz"))
        .unwrap_err()
        .to_string();
    let checksum = import_wallet(&vec!["abandon"; 12].join(" "))
        .unwrap_err()
        .to_string();

    assert!(count.contains("exactly 12 words"), "{}", count);
    assert!(unknown.contains("word 12"), "{}", unknown);
    assert!(checksum.contains("checksum"), "{}", checksum);
    assert!(!unknown.contains("zzzz"), "Rejected words should not be echoed");
}

#[test]
fn test_normalize_phrase_order_of_operations() {
    assert_eq!(
        normalize_phrase("  Zoo\tZOO \n zoo  "),
        vec!["zoo".to_string(), "zoo".to_string(), "zoo".to_string()]
    );
    assert!(normalize_phrase("").is_empty());
    assert!(normalize_phrase(" \t\r\n").is_empty());
}

#[test]
fn test_entropy_to_words_known_vectors() {
    assert_eq!(entropy_to_words(&[0u8; 16]).unwrap(), words(ABANDON_ABOUT));
    assert_eq!(entropy_to_words(&[0x7f; 16]).unwrap(), words(LEGAL_WINNER));
    assert_eq!(
        entropy_to_words(&[0xff; 16]).unwrap(),
        words("zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong")
    );
}

#[test]
fn test_validate_words_accepts_standard_vectors() {
    validate_words(&words(ABANDON_ABOUT)).expect("abandon/about is valid");
    validate_words(&words(LEGAL_WINNER)).expect("legal/winner is valid");
    validate_words(&words("zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong"))
        .expect("zoo/wrong is valid");
}

#[test]
fn test_seed_matches_bip39_crate_and_known_value() {
    let seed = mnemonic_to_seed(&words(ABANDON_ABOUT));

    assert_eq!(
        hex::encode(&seed[..]),
        "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
         9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
    );

    let reference = Mnemonic::parse(ABANDON_ABOUT).unwrap().to_seed("");
    assert_eq!(&seed[..], &reference[..], "Seed should match the bip39 crate");
}

#[test]
fn test_master_key_matches_bitcoin_xpriv() {
    for phrase in [ABANDON_ABOUT, LEGAL_WINNER] {
        let seed = mnemonic_to_seed(&words(phrase));
        let key = master_key_from_seed(&seed).expect("Master key derivation failed");

        let xpriv = bitcoin::bip32::Xpriv::new_master(bitcoin::Network::Bitcoin, &seed[..])
            .expect("bitcoin crate master key derivation failed");

        assert_eq!(
            hex::encode(&key[..]),
            hex::encode(xpriv.private_key.secret_bytes()),
            "Master key should match BIP32 reference for {:?}",
            phrase
        );
    }
}

#[test]
fn test_derive_snapshot_keeps_words_and_pads_key() {
    let snapshot = derive_snapshot(words(LEGAL_WINNER)).expect("Derivation failed");

    assert_eq!(snapshot.mnemonic_words(), words(LEGAL_WINNER).as_slice());
    assert_lower_hex_64(snapshot.private_key_hex());
}

#[test]
fn test_snapshot_debug_redacts_secrets() {
    let snapshot = import_wallet(ABANDON_ABOUT).unwrap();
    let debug = format!("{:?}", snapshot);

    assert!(!debug.contains("abandon"), "Debug output leaked mnemonic: {}", debug);
    assert!(!debug.contains(ABANDON_ABOUT_KEY), "Debug output leaked key: {}", debug);
    assert!(debug.contains("12 words"));
}
