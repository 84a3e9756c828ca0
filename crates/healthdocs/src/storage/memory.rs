//! In-memory key-value backend.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::trace;

use super::KeyValueBackend;
use crate::error::{Error, Result};

/// A `HashMap`-backed store, optionally capped at a byte quota.
///
/// The quota counts key and value bytes of everything held, the same way a
/// browser's local storage budget does. Writes that would overflow it fail
/// and leave the previous value in place.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Create an empty, unbounded backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend that rejects writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota: Some(quota),
        }
    }

    /// Store a raw value, bypassing the quota.
    ///
    /// Lets tests plant content the store itself would never write.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), value.into());
    }

    /// Total bytes currently held.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > limit {
                return Err(Error::QuotaExceeded { needed, limit });
            }
        }

        trace!(key, bytes = value.len(), "memory backend write");
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
