//! Key-value backends for healthdocs.
//!
//! The document store keeps its whole collection under a single key, so all a
//! backend needs to offer is get, set and remove of string values. Two
//! implementations are provided: an in-memory map for tests and embedding, and
//! a `SQLite` file for durable local storage.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::error::Result;

/// A string key-value store.
///
/// Implementations only need to be consistent within one process; the
/// document store performs no locking and the last full write wins.
pub trait KeyValueBackend {
    /// Read the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected, for example because a
    /// capacity limit would be exceeded.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// Bytes the backend occupies on disk, `None` if it keeps nothing there.
    fn size_on_disk(&self) -> Option<u64> {
        None
    }
}

impl<T: KeyValueBackend + ?Sized> KeyValueBackend for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn size_on_disk(&self) -> Option<u64> {
        (**self).size_on_disk()
    }
}

impl<T: KeyValueBackend + ?Sized> KeyValueBackend for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn size_on_disk(&self) -> Option<u64> {
        (**self).size_on_disk()
    }
}
