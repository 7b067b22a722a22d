//! Local key value storage of a peer.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
pub use crate::storage::memory::MemStorage;

/// Key value storage interface
#[async_trait]
pub trait KvStorageInterface<V> {
    /// Get an entry by `key`.
    async fn get(&self, key: &str) -> Result<Option<V>>;

    /// Put `value` under `key`, overwriting any previous value.
    async fn put(&self, key: &str, value: &V) -> Result<()>;

    /// Snapshot of every entry.
    async fn get_all(&self) -> Result<Vec<(String, V)>>;

    /// Remove an entry by `key`, returning the previous value.
    async fn remove(&self, key: &str) -> Result<Option<V>>;

    /// All keys currently held.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Delete all values.
    async fn clear(&self) -> Result<()>;

    /// Get the current storage usage.
    async fn count(&self) -> Result<u32>;
}
