//! Encrypted key-value medium abstraction
//!
//! The wallet store never touches files or platform keystores directly; it
//! goes through a [`SecureMedium`] handle supplied by the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Medium-level errors
#[derive(Debug, thiserror::Error)]
pub enum MediumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Unsupported store format: {0}")]
    Format(String),

    #[error("Medium unavailable: {0}")]
    Unavailable(String),
}

/// A single stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediumValue {
    Integer(i64),
    Text(String),
}

impl MediumValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MediumValue::Text(s) => Some(s),
            MediumValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MediumValue::Integer(n) => Some(*n),
            MediumValue::Text(_) => None,
        }
    }
}

impl From<String> for MediumValue {
    fn from(value: String) -> Self {
        MediumValue::Text(value)
    }
}

impl From<&str> for MediumValue {
    fn from(value: &str) -> Self {
        MediumValue::Text(value.to_string())
    }
}

impl From<i64> for MediumValue {
    fn from(value: i64) -> Self {
        MediumValue::Integer(value)
    }
}

/// Set of writes applied together by [`SecureMedium::commit`]
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    entries: BTreeMap<String, MediumValue>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `value` under `key`, replacing anything staged earlier
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<MediumValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_entries(self) -> BTreeMap<String, MediumValue> {
        self.entries
    }
}

/// Opaque key-value store with confidentiality and integrity at rest
///
/// Implementations must apply a whole [`WriteBatch`] or none of it.
pub trait SecureMedium {
    /// Read a value; `Ok(None)` means the key was never written
    fn get(&self, key: &str) -> Result<Option<MediumValue>, MediumError>;

    /// Read several values from one consistent view of the medium
    ///
    /// Results are in the order of `keys`. The default reads each key
    /// separately; media that can read everything at once should override it.
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<MediumValue>>, MediumError> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Apply every write in `batch` atomically
    fn commit(&mut self, batch: WriteBatch) -> Result<(), MediumError>;
}

impl<M: SecureMedium + ?Sized> SecureMedium for Box<M> {
    fn get(&self, key: &str) -> Result<Option<MediumValue>, MediumError> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<MediumValue>>, MediumError> {
        (**self).get_many(keys)
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), MediumError> {
        (**self).commit(batch)
    }
}
