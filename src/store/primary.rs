//! PrimaryStore - The keyed blob store collections are persisted to.

use std::time::Duration;

use super::StoreError;

/// A Redis-shaped keyed store: string blobs with optional expiry, plus
/// string sets.
///
/// Implementations are synchronous; the HTTP layer runs dispatch on the
/// blocking pool.
pub trait PrimaryStore: Send + Sync {
    /// Get the blob under `key`. `Ok(None)` when the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the blob under `key`, expiring after `ttl` when given.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Add `member` to the set under `key`. Returns true if it was new.
    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Remove `member` from the set under `key`. Returns true if it was present.
    fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// All members of the set under `key` (empty when the key is absent).
    fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Round-trip check used by health reporting.
    fn ping(&self) -> Result<(), StoreError>;
}
