//! In-memory key/value store.

use std::{
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::store::{KeyValueStore, StoreError};

#[derive(Debug)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
    deadline: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.deadline.is_none_or(|deadline| deadline > now)
    }
}

/// [`KeyValueStore`] backed by a map, honouring per-key expiry.
///
/// Can be switched into failure modes to exercise error propagation.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    entries: Mutex<FxHashMap<String, Entry>>,
    unavailable: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStore {
    fn entries(&self) -> MutexGuard<'_, FxHashMap<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }

        Ok(())
    }

    /// Make every operation fail as if the server were unreachable.
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only deletes fail.
    pub(crate) fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Store a raw value with no expiry.
    pub(crate) fn insert(&self, key: &str, value: &str) {
        self.entries().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl: None,
                deadline: None,
            },
        );
    }

    /// Drop a key outright, bypassing failure switches.
    pub(crate) fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        let now = Instant::now();

        self.entries().get(key).is_some_and(|entry| entry.is_live(now))
    }

    /// The TTL the key was last written with.
    pub(crate) fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries().get(key).and_then(|entry| entry.ttl)
    }

    pub(crate) fn len(&self) -> usize {
        let now = Instant::now();

        self.entries()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;

        let now = Instant::now();

        Ok(self
            .entries()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.check_available()?;

        self.entries().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl: Some(ttl),
                deadline: Some(Instant::now() + ttl),
            },
        );

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
        self.check_available()?;

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("delete rejected".to_string()));
        }

        let mut entries = self.entries();

        for key in keys {
            entries.remove(key);
        }

        Ok(())
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        self.check_available()?;

        let now = Instant::now();
        let prefix = pattern.trim_end_matches('*');

        let mut keys: Vec<String> = self
            .entries()
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();

        keys.sort_unstable();

        Ok(keys)
    }
}
