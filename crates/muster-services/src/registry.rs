//! Listing registry — the authoritative map of live server listings.
//!
//! One `RwLock` guards both the listings and the stats from the last sweep.
//! Every mutation (a single upsert, a whole ingestion batch, a sweep pass)
//! takes the write lock once, so readers only ever see complete states.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use muster_core::{AggregateStats, ListingKey, ListingRecord};

#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) listings: BTreeMap<ListingKey, ListingRecord>,
    pub(crate) stats: AggregateStats,
}

impl RegistryState {
    fn upsert(&mut self, key: ListingKey, mut record: ListingRecord, now: DateTime<Utc>) {
        record.added = now;
        self.listings.insert(key, record);
    }

    fn remove(&mut self, key: &ListingKey) -> bool {
        self.listings.remove(key).is_some()
    }
}

/// Point-in-time copy of the registry for presentation code.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrySnapshot {
    pub listings: BTreeMap<ListingKey, ListingRecord>,
    pub stats: AggregateStats,
}

/// Shared handle to the listing registry. Clones share the same store.
#[derive(Clone, Default)]
pub struct Registry {
    state: Arc<RwLock<RegistryState>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written map entry
    // behind, so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or fully replace the listing at `key`, stamping it as seen now.
    pub fn upsert(&self, key: ListingKey, record: ListingRecord) {
        self.upsert_at(key, record, Utc::now());
    }

    /// [`Registry::upsert`] with an explicit timestamp.
    pub fn upsert_at(&self, key: ListingKey, record: ListingRecord, now: DateTime<Utc>) {
        self.write().upsert(key, record, now);
    }

    /// Remove the listing at `key`. Returns whether one was present; removing
    /// an absent key is not an error.
    pub fn remove(&self, key: &ListingKey) -> bool {
        self.write().remove(key)
    }

    /// Run `f` against the store with the write lock held for its whole
    /// duration. Used to apply a report batch as one unit.
    pub fn apply<R>(&self, f: impl FnOnce(&mut Batch<'_>) -> R) -> R {
        let mut guard = self.write();
        let mut batch = Batch { state: &mut *guard };
        f(&mut batch)
    }

    pub fn get(&self, key: &ListingKey) -> Option<ListingRecord> {
        self.read().listings.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().listings.is_empty()
    }

    /// Stats computed by the most recent sweep.
    pub fn stats(&self) -> AggregateStats {
        self.read().stats
    }

    /// Consistent copy of every listing plus the last sweep's stats.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.read();
        RegistrySnapshot {
            listings: state.listings.clone(),
            stats: state.stats,
        }
    }
}

/// Mutation access handed out by [`Registry::apply`].
///
/// Only upsert and remove are exposed; eviction and stats belong to the
/// sweeper.
pub struct Batch<'a> {
    state: &'a mut RegistryState,
}

impl Batch<'_> {
    pub fn upsert(&mut self, key: ListingKey, record: ListingRecord) {
        self.state.upsert(key, record, Utc::now());
    }

    pub fn remove(&mut self, key: &ListingKey) -> bool {
        self.state.remove(key)
    }
}
