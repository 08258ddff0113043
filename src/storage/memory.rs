//! In-memory medium
//!
//! Holds entries in a plain map. Suitable for tests and for hosts that
//! encrypt at a lower layer.

use std::collections::HashMap;

use super::medium::{MediumError, MediumValue, SecureMedium, WriteBatch};

#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: HashMap<String, MediumValue>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a single entry outside of a batch (tests use this to
    /// simulate external tampering)
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<MediumValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove_raw(&mut self, key: &str) -> Option<MediumValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SecureMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<MediumValue>, MediumError> {
        Ok(self.entries.get(key).cloned())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), MediumError> {
        self.entries.extend(batch.into_entries());
        Ok(())
    }
}
