//! Store - Collection persistence with a primary store and an in-process fallback.
//!
//! Every collection is one serialized JSON blob under one key. Reads never
//! fail: when the primary store is absent, unreachable, or holds an
//! undecodable blob, the accessor logs a warning and serves the fallback
//! copy instead. Writes are best-effort and always mirrored into the
//! fallback.
//!
//! ## Example
//!
//! ```ignore
//! use rawfeed::store::{Collections, MemoryStore, Scope};
//! use rawfeed::domain::Pet;
//!
//! let collections = Collections::builder().fallback(MemoryStore::new()).build();
//! let pets = collections.collection::<Pet>(Scope::Global);
//! pets.insert(pet);
//! let mine: Vec<Pet> = pets.all().into_iter().filter(|p| p.user_id == "u1").collect();
//! ```
//!
//! The fallback is process-local: it does not survive restarts and is not
//! shared between replicas.

mod collection;
mod collections;
mod memory;
mod primary;
#[cfg(feature = "redis")]
mod redis;

use std::fmt;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use collection::Collection;
pub use collections::{Collections, CollectionsBuilder, DEFAULT_PREFIX};
pub use memory::MemoryStore;
pub use primary::PrimaryStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

/// Longest collection TTL accepted from configuration (ten years).
pub const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Trait for flat records stored as a whole-collection blob.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name (the blob key stem, e.g. "pets", "orders").
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this record.
    fn id(&self) -> &str;

    /// Records written to an empty collection on first access.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

/// Which blob of a collection an operation addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One blob for the whole collection.
    Global,
    /// One blob per owning user (e.g. a user's orders).
    Owner(String),
}

impl Scope {
    pub fn owner(user_id: impl Into<String>) -> Self {
        Scope::Owner(user_id.into())
    }

    /// Storage key for `collection` under this scope.
    pub fn key(&self, prefix: &str, collection: &str) -> String {
        match self {
            Scope::Global => format!("{}:{}", prefix, collection),
            Scope::Owner(owner) => format!("{}:{}:{}", prefix, collection, owner),
        }
    }
}

/// Where a write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// The primary store accepted the write (the fallback mirrors it).
    Primary,
    /// Only the process-local fallback holds the write.
    FallbackOnly,
    /// Nothing was written: the collection failed to serialize.
    Dropped,
}

/// Primary store health as seen by the accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryStatus {
    /// No primary store configured.
    Disabled,
    Connected,
    Unavailable,
}

impl fmt::Display for PrimaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryStatus::Disabled => write!(f, "disabled"),
            PrimaryStatus::Connected => write!(f, "connected"),
            PrimaryStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Error type for store backends. Never surfaces past `Collections`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The backend rejected or failed the command.
    #[error("store backend error: {0}")]
    Backend(String),
    /// A set operation hit a blob key, or the other way round.
    #[error("wrong type for key {key}")]
    WrongType { key: String },
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
