//! Encrypted single-file medium
//!
//! Stores all entries as one AES-256-GCM sealed JSON document:
//! - Key: PBKDF2-HMAC-SHA256 over the host passphrase with a random
//!   128-bit salt per store, derived once on open
//! - Fresh random 96-bit nonce for every commit
//! - On disk: `{ version, kdf_iterations, salt, nonce, ciphertext }`, hex
//!   fields, ciphertext includes the 16-byte tag
//!
//! Commits go to a temp file that is synced and then renamed over the
//! target, so a reader sees either the old or the new document.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::medium::{MediumError, MediumValue, SecureMedium, WriteBatch};

/// Current envelope version
const FORMAT_VERSION: u32 = 1;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

type Entries = BTreeMap<String, MediumValue>;

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct StoreEnvelope {
    version: u32,
    kdf_iterations: u32,
    salt: String,
    nonce: String,
    ciphertext: String,
}

/// File-backed [`SecureMedium`] sealed with a passphrase-derived key
pub struct EncryptedFileMedium {
    path: PathBuf,
    salt: [u8; SALT_LEN],
    kdf_iterations: u32,
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl EncryptedFileMedium {
    /// Open (or prepare to create) the store at `path`
    ///
    /// For an existing file the salt and iteration count recorded in it are
    /// used and `kdf_iterations` is ignored. Nothing is written until the
    /// first commit.
    ///
    /// # Errors
    ///
    /// Returns error if the existing file cannot be read or is not a
    /// supported envelope. A wrong passphrase is only detected on the first
    /// read, since the key has to be tried against the ciphertext.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let medium = EncryptedFileMedium::open("wallet_secure_store.json", "passphrase", 600_000)?;
    /// let store = WalletStore::new(medium);
    /// ```
    pub fn open(
        path: impl Into<PathBuf>,
        passphrase: &str,
        kdf_iterations: u32,
    ) -> Result<Self, MediumError> {
        let path = path.into();

        let (salt, kdf_iterations) = match read_envelope(&path)? {
            Some(envelope) => {
                let salt = decode_fixed::<SALT_LEN>(&envelope.salt, "salt")?;
                if envelope.kdf_iterations != kdf_iterations {
                    log::debug!(
                        "Using recorded KDF iterations {} (configured {})",
                        envelope.kdf_iterations,
                        kdf_iterations
                    );
                }
                (salt, envelope.kdf_iterations)
            }
            None => {
                let mut salt = [0u8; SALT_LEN];
                OsRng
                    .try_fill_bytes(&mut salt)
                    .map_err(|e| MediumError::Unavailable(e.to_string()))?;
                (salt, kdf_iterations)
            }
        };

        if kdf_iterations == 0 {
            return Err(MediumError::Format(
                "KDF iteration count must be at least 1".to_string(),
            ));
        }

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), &salt, kdf_iterations, key.as_mut_slice());

        log::debug!("Opened encrypted store at {}", path.display());

        Ok(Self {
            path,
            salt,
            kdf_iterations,
            key,
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been written yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(self.key.as_slice()))
    }

    fn read_entries(&self) -> Result<Entries, MediumError> {
        let envelope = match read_envelope(&self.path)? {
            Some(envelope) => envelope,
            None => return Ok(Entries::new()),
        };

        let salt = decode_fixed::<SALT_LEN>(&envelope.salt, "salt")?;
        if salt != self.salt || envelope.kdf_iterations != self.kdf_iterations {
            return Err(MediumError::Decryption(
                "Store was re-keyed by another writer".to_string(),
            ));
        }

        let nonce_bytes = decode_fixed::<NONCE_LEN>(&envelope.nonce, "nonce")?;
        let ciphertext = hex::decode(&envelope.ciphertext)
            .map_err(|e| MediumError::Decryption(e.to_string()))?;

        let plaintext = Zeroizing::new(
            self.cipher()
                .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
                .map_err(|e| {
                    MediumError::Decryption(format!("Decryption failed (wrong passphrase?): {}", e))
                })?,
        );

        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), MediumError> {
        let plaintext = Zeroizing::new(serde_json::to_vec(entries)?);

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| MediumError::Unavailable(e.to_string()))?;

        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_slice())
            .map_err(|e| MediumError::Encryption(e.to_string()))?;

        let envelope = StoreEnvelope {
            version: FORMAT_VERSION,
            kdf_iterations: self.kdf_iterations,
            salt: hex::encode(self.salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        };
        let json = serde_json::to_vec_pretty(&envelope)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path();
        let written =
            write_synced(&tmp_path, &json).and_then(|_| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Staging file for commits: the store file name with `.tmp` appended
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SecureMedium for EncryptedFileMedium {
    fn get(&self, key: &str) -> Result<Option<MediumValue>, MediumError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<MediumValue>>, MediumError> {
        let entries = self.read_entries()?;
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), MediumError> {
        let mut entries = self.read_entries()?;
        entries.extend(batch.into_entries());
        self.write_entries(&entries)
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn read_envelope(path: &Path) -> Result<Option<StoreEnvelope>, MediumError> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path)?;
    let envelope: StoreEnvelope = serde_json::from_str(&json)?;

    if envelope.version != FORMAT_VERSION {
        return Err(MediumError::Format(format!(
            "envelope version {} (expected {})",
            envelope.version, FORMAT_VERSION
        )));
    }

    Ok(Some(envelope))
}

fn decode_fixed<const N: usize>(hex_str: &str, field: &str) -> Result<[u8; N], MediumError> {
    let bytes = hex::decode(hex_str).map_err(|e| MediumError::Format(format!("{}: {}", field, e)))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        MediumError::Format(format!("{}: expected {} bytes, got {}", field, N, bytes.len()))
    })
}
