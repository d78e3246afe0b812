//! MemoryStore - HashMap-backed keyed store for the fallback path and tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::{PrimaryStore, StoreError};

/// Internal stored representation of a key.
enum Entry {
    Blob {
        value: String,
        expires_at: Option<Instant>,
    },
    Set(BTreeSet<String>),
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        match self {
            Entry::Blob {
                expires_at: Some(at),
                ..
            } => *at <= now,
            _ => false,
        }
    }
}

/// In-memory keyed store.
///
/// Process-local and non-durable. Clone-friendly via Arc: clones share
/// storage, so one instance can be injected as the fallback of a
/// `Collections` and inspected from a test.
#[derive(Clone)]
pub struct MemoryStore {
    storage: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// True if `key` holds a live (unexpired) value.
    pub fn contains(&self, key: &str) -> bool {
        self.storage
            .read()
            .map(|storage| {
                storage
                    .get(key)
                    .is_some_and(|entry| !entry.is_expired(Instant::now()))
            })
            .unwrap_or(false)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.storage
            .read()
            .map(|storage| storage.values().filter(|e| !e.is_expired(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the set under `key` with exactly `members`.
    pub fn replace_set(&self, key: &str, members: &[String]) {
        if let Ok(mut storage) = self.storage.write() {
            storage.insert(
                key.to_string(),
                Entry::Set(members.iter().cloned().collect()),
            );
        }
    }
}

impl PrimaryStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;

        match storage.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => Ok(None),
            Some(Entry::Blob { value, .. }) => Ok(Some(value.clone())),
            Some(Entry::Set(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("set"))?;

        storage.insert(
            key.to_string(),
            Entry::Blob {
                value: value.to_string(),
                // A TTL past the clock's range never expires.
                expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
            },
        );
        Ok(())
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("set_add"))?;

        let now = Instant::now();
        if storage.get(key).is_some_and(|e| e.is_expired(now)) {
            storage.remove(key);
        }

        match storage
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()))
        {
            Entry::Set(members) => Ok(members.insert(member.to_string())),
            Entry::Blob { .. } => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("set_remove"))?;

        match storage.get_mut(key) {
            Some(Entry::Set(members)) => Ok(members.remove(member)),
            Some(entry) if entry.is_expired(Instant::now()) => Ok(false),
            Some(Entry::Blob { .. }) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
            None => Ok(false),
        }
    }

    fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("set_members"))?;

        match storage.get(key) {
            Some(Entry::Set(members)) => Ok(members.iter().cloned().collect()),
            Some(entry) if entry.is_expired(Instant::now()) => Ok(Vec::new()),
            Some(Entry::Blob { .. }) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
