//! Collection - Typed accessor with read-modify-write helpers.

use std::marker::PhantomData;
use std::sync::PoisonError;

use super::{Collections, Durability, Record, Scope};

/// One collection under one scope.
///
/// Every mutating helper fetches the whole collection, mutates it in memory,
/// and writes the whole collection back. Cycles on the same key are
/// serialized within this process; across processes the last write wins.
pub struct Collection<'a, R> {
    collections: &'a Collections,
    scope: Scope,
    _marker: PhantomData<R>,
}

impl<'a, R: Record> Collection<'a, R> {
    pub fn new(collections: &'a Collections, scope: Scope) -> Self {
        Self {
            collections,
            scope,
            _marker: PhantomData,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn key(&self) -> String {
        self.collections.key_for::<R>(&self.scope)
    }

    /// Every record, in stored order.
    pub fn all(&self) -> Vec<R> {
        self.collections.get_all(&self.scope)
    }

    /// Linear scan for `id`.
    pub fn find(&self, id: &str) -> Option<R> {
        self.all().into_iter().find(|r| r.id() == id)
    }

    /// Replace the whole collection.
    pub fn save(&self, records: &[R]) -> Durability {
        self.collections.save_all(&self.scope, records)
    }

    /// Append a record. The id is not checked for uniqueness.
    pub fn insert(&self, record: R) -> R {
        self.modify(|records| {
            records.push(record.clone());
            Some(())
        });
        record
    }

    /// Apply `f` to the record with `id`.
    ///
    /// `Ok(None)` when no record matches; nothing is written when `f` fails.
    pub fn update<E>(
        &self,
        id: &str,
        f: impl FnOnce(&mut R) -> Result<(), E>,
    ) -> Result<Option<R>, E> {
        let mut outcome = Ok(None);
        self.modify(|records| {
            let record = records.iter_mut().find(|r| r.id() == id)?;
            match f(record) {
                Ok(()) => {
                    outcome = Ok(Some(record.clone()));
                    Some(())
                }
                Err(e) => {
                    outcome = Err(e);
                    None
                }
            }
        });
        outcome
    }

    /// Remove the record with `id`. `None` (and no write) when absent.
    pub fn remove(&self, id: &str) -> Option<R> {
        self.modify(|records| {
            let index = records.iter().position(|r| r.id() == id)?;
            Some(records.remove(index))
        })
    }

    /// Run one read-modify-write cycle. The collection is written back only
    /// when `f` returns `Some`.
    pub fn modify<T>(&self, f: impl FnOnce(&mut Vec<R>) -> Option<T>) -> Option<T> {
        let lock = self.collections.key_lock(&self.key());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.all();
        let result = f(&mut records)?;
        self.save(&records);
        Some(result)
    }
}
