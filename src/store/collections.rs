//! Collections - The get/save accessor pair over primary and fallback stores.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, warn};

use super::{Collection, Durability, MemoryStore, PrimaryStatus, PrimaryStore, Record, Scope};

pub const DEFAULT_PREFIX: &str = "rawfeed";

/// Uniform read/write access to whole-collection blobs.
///
/// `primary` is optional: `None` means no primary store is configured and
/// every operation goes straight to the fallback. The fallback is injected
/// so tests (and replicas) each get their own isolated copy.
pub struct Collections {
    primary: Option<Arc<dyn PrimaryStore>>,
    fallback: MemoryStore,
    prefix: String,
    ttl: Option<Duration>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Default for Collections {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Collections {
    pub fn builder() -> CollectionsBuilder {
        CollectionsBuilder::default()
    }

    /// Typed accessor for one collection under one scope.
    pub fn collection<R: Record>(&self, scope: Scope) -> Collection<'_, R> {
        Collection::new(self, scope)
    }

    pub fn key_for<R: Record>(&self, scope: &Scope) -> String {
        scope.key(&self.prefix, R::COLLECTION)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The process-local fallback store.
    pub fn fallback(&self) -> &MemoryStore {
        &self.fallback
    }

    /// Read the whole collection. Never fails.
    ///
    /// Primary hit: decode the blob (and refresh the fallback copy).
    /// Primary miss: seed the collection. Primary absent, failing, or holding
    /// an undecodable blob: serve the fallback copy.
    pub fn get_all<R: Record>(&self, scope: &Scope) -> Vec<R> {
        let key = self.key_for::<R>(scope);

        if let Some(primary) = &self.primary {
            match primary.get(&key) {
                Ok(Some(blob)) => match serde_json::from_str::<Vec<R>>(&blob) {
                    Ok(records) => {
                        self.mirror(&key, &blob);
                        return records;
                    }
                    Err(e) => {
                        warn!(key = %key, error = %e, "stored collection is undecodable, serving fallback");
                    }
                },
                Ok(None) => return self.seed_primary::<R>(primary.as_ref(), &key),
                Err(e) => {
                    warn!(key = %key, error = %e, "primary store read failed, serving fallback");
                }
            }
        }

        self.read_fallback::<R>(&key)
    }

    /// Write the whole collection. Best-effort; never fails.
    ///
    /// The fallback always receives a copy, so a primary outage right after
    /// this call still serves the latest write from this process.
    pub fn save_all<R: Record>(&self, scope: &Scope, records: &[R]) -> Durability {
        let key = self.key_for::<R>(scope);

        let blob = match serde_json::to_string(records) {
            Ok(blob) => blob,
            Err(e) => {
                error!(key = %key, error = %e, "failed to serialize collection, write dropped");
                return Durability::Dropped;
            }
        };

        self.mirror(&key, &blob);

        match &self.primary {
            Some(primary) => match primary.set(&key, &blob, self.ttl) {
                Ok(()) => Durability::Primary,
                Err(e) => {
                    warn!(key = %key, error = %e, "primary store write failed, kept in fallback only");
                    Durability::FallbackOnly
                }
            },
            None => Durability::FallbackOnly,
        }
    }

    /// Members of a set-shaped collection (e.g. a wishlist). Never fails.
    pub fn set_members(&self, scope: &Scope, collection: &str) -> Vec<String> {
        let key = scope.key(&self.prefix, collection);

        if let Some(primary) = &self.primary {
            match primary.set_members(&key) {
                Ok(members) => {
                    self.fallback.replace_set(&key, &members);
                    return members;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "primary store set read failed, serving fallback");
                }
            }
        }

        self.fallback.set_members(&key).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "fallback set read failed");
            Vec::new()
        })
    }

    /// Add to a set-shaped collection. Returns true if the member was new.
    pub fn set_add(&self, scope: &Scope, collection: &str, member: &str) -> bool {
        let key = scope.key(&self.prefix, collection);
        let local = self.fallback.set_add(&key, member).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "fallback set write failed");
            false
        });

        match &self.primary {
            Some(primary) => primary.set_add(&key, member).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "primary store set write failed, kept in fallback only");
                local
            }),
            None => local,
        }
    }

    /// Remove from a set-shaped collection. Returns true if the member was present.
    pub fn set_remove(&self, scope: &Scope, collection: &str, member: &str) -> bool {
        let key = scope.key(&self.prefix, collection);
        let local = self.fallback.set_remove(&key, member).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "fallback set write failed");
            false
        });

        match &self.primary {
            Some(primary) => primary.set_remove(&key, member).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "primary store set write failed, kept in fallback only");
                local
            }),
            None => local,
        }
    }

    /// Primary store health for `/health`.
    pub fn primary_status(&self) -> PrimaryStatus {
        match &self.primary {
            None => PrimaryStatus::Disabled,
            Some(primary) => match primary.ping() {
                Ok(()) => PrimaryStatus::Connected,
                Err(e) => {
                    warn!(error = %e, "primary store ping failed");
                    PrimaryStatus::Unavailable
                }
            },
        }
    }

    /// Per-key mutex serializing read-modify-write cycles in this process.
    pub(crate) fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn mirror(&self, key: &str, blob: &str) {
        if let Err(e) = self.fallback.set(key, blob, self.ttl) {
            warn!(key = %key, error = %e, "fallback write failed");
        }
    }

    fn seed_primary<R: Record>(&self, primary: &dyn PrimaryStore, key: &str) -> Vec<R> {
        let seed = R::seed();
        if seed.is_empty() {
            return seed;
        }

        match serde_json::to_string(&seed) {
            Ok(blob) => {
                self.mirror(key, &blob);
                if let Err(e) = primary.set(key, &blob, self.ttl) {
                    warn!(key = %key, error = %e, "failed to seed primary store");
                }
            }
            Err(e) => error!(key = %key, error = %e, "failed to serialize seed"),
        }
        seed
    }

    fn read_fallback<R: Record>(&self, key: &str) -> Vec<R> {
        match self.fallback.get(key) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<R>>(&blob) {
                Ok(records) => return records,
                Err(e) => warn!(key = %key, error = %e, "fallback collection is undecodable, reseeding"),
            },
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "fallback read failed, reseeding"),
        }

        let seed = R::seed();
        if !seed.is_empty() {
            if let Ok(blob) = serde_json::to_string(&seed) {
                self.mirror(key, &blob);
            }
        }
        seed
    }
}

/// Builder for `Collections`.
#[derive(Default)]
pub struct CollectionsBuilder {
    primary: Option<Arc<dyn PrimaryStore>>,
    fallback: Option<MemoryStore>,
    prefix: Option<String>,
    ttl: Option<Duration>,
}

impl CollectionsBuilder {
    pub fn primary(mut self, primary: impl PrimaryStore + 'static) -> Self {
        self.primary = Some(Arc::new(primary));
        self
    }

    pub fn primary_arc(mut self, primary: Arc<dyn PrimaryStore>) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn fallback(mut self, fallback: MemoryStore) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn build(self) -> Collections {
        Collections {
            primary: self.primary,
            fallback: self.fallback.unwrap_or_default(),
            prefix: self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            ttl: self.ttl,
            locks: Mutex::new(HashMap::new()),
        }
    }
}
