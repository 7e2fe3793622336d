//! # Channel registry.
//!
//! Maps a channel key to a bucket holding that channel's listener entries,
//! kept sorted by priority (registration order within a tier).
//!
//! ## Architecture
//! ```text
//! Registry
//!   papaya::HashMap<String, Arc<dyn AnyBucket>>      (lock-free per key)
//!        │
//!        ├── "score.changed" ──► Bucket<u32>  Mutex ─► Arc<[Arc<Entry<u32>>]>
//!        └── "game.over"     ──► Bucket<()>   Mutex ─► Arc<[Arc<Entry<()>>]>
//! ```
//!
//! ## Rules
//! - Operations on different keys never contend: the map is concurrent and each
//!   bucket has its own lock.
//! - The entry list is copy-on-write: mutation swaps in a new `Arc<[..]>`, so a
//!   dispatch snapshot is a refcount bump and is never disturbed by later writes.
//! - A bucket that becomes empty is **retired** under its own lock and removed
//!   from the map. Writers that observe a retired bucket retry against a fresh
//!   one, so no registration is lost to a concurrent removal.
//! - Each bucket records its payload type; a registration of another type under
//!   the same key fails with [`BusError::PayloadMismatch`].

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::entry::Entry;
use crate::error::BusError;

pub(crate) type Snapshot<T> = Arc<[Arc<Entry<T>>]>;

/// Which of the two registries an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RegistryKind {
    Persistent,
    Once,
}

impl RegistryKind {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            RegistryKind::Persistent => "persistent",
            RegistryKind::Once => "once",
        }
    }
}

struct BucketState<T> {
    entries: Snapshot<T>,
    retired: bool,
}

pub(crate) struct Bucket<T> {
    state: Mutex<BucketState<T>>,
}

impl<T> Bucket<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(BucketState {
                entries: Vec::new().into(),
                retired: false,
            }),
        }
    }

    /// Inserts after every entry of the same or higher tier.
    ///
    /// Returns `false` if the bucket was retired; the caller must retry.
    fn insert(&self, entry: Arc<Entry<T>>) -> bool {
        let mut state = self.state.lock();
        if state.retired {
            return false;
        }
        let pos = state
            .entries
            .partition_point(|e| e.priority <= entry.priority);

        let mut next = Vec::with_capacity(state.entries.len() + 1);
        next.extend_from_slice(&state.entries[..pos]);
        next.push(entry);
        next.extend_from_slice(&state.entries[pos..]);
        state.entries = next.into();
        true
    }

    /// Point-in-time copy of the entry list.
    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        Arc::clone(&self.state.lock().entries)
    }
}

/// Type-erased view of a bucket, so the map can hold every payload type.
trait AnyBucket: Send + Sync {
    fn payload_type(&self) -> TypeId;
    fn payload_name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn is_retired(&self) -> bool;

    /// Retires the bucket, running `detach` under its lock. Returns the number of
    /// entries dropped, or `None` if it was already retired.
    fn retire(&self, detach: &mut dyn FnMut()) -> Option<usize>;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: 'static> AnyBucket for Bucket<T> {
    fn payload_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn payload_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    fn is_retired(&self) -> bool {
        self.state.lock().retired
    }

    fn retire(&self, detach: &mut dyn FnMut()) -> Option<usize> {
        let mut state = self.state.lock();
        if state.retired {
            return None;
        }
        let dropped = state.entries.len();
        state.retired = true;
        state.entries = Vec::new().into();
        detach();
        Some(dropped)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Result of resolving a key for a given payload type.
pub(crate) enum Lookup<T> {
    Missing,
    Found(Arc<Bucket<T>>),
    Mismatch { found: &'static str },
}

/// One channel-key → bucket mapping.
pub(crate) struct Registry {
    kind: RegistryKind,
    buckets: papaya::HashMap<String, Arc<dyn AnyBucket>>,
}

impl Registry {
    pub(crate) fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            buckets: papaya::HashMap::new(),
        }
    }

    pub(crate) fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Resolves the live bucket for `key`.
    pub(crate) fn lookup<T: 'static>(&self, key: &str) -> Lookup<T> {
        let erased = match self.buckets.pin().get(key) {
            Some(bucket) => Arc::clone(bucket),
            None => return Lookup::Missing,
        };
        if erased.payload_type() != TypeId::of::<T>() {
            return Lookup::Mismatch {
                found: erased.payload_name(),
            };
        }
        match erased.into_any().downcast::<Bucket<T>>() {
            Ok(bucket) => Lookup::Found(bucket),
            Err(_) => Lookup::Missing,
        }
    }

    /// Inserts `entry` into the bucket for `key`, creating the bucket if needed.
    ///
    /// # Errors
    /// [`BusError::PayloadMismatch`] if the live bucket carries another payload type.
    pub(crate) fn insert<T: 'static>(
        &self,
        key: &str,
        entry: Arc<Entry<T>>,
    ) -> Result<(), BusError> {
        loop {
            let erased = {
                let map = self.buckets.pin();
                match map.get(key) {
                    Some(bucket) => Arc::clone(bucket),
                    None => Arc::clone(map.get_or_insert_with(key.to_owned(), || {
                        tracing::trace!(
                            channel = key,
                            registry = self.kind.as_label(),
                            "bucket created"
                        );
                        Arc::new(Bucket::<T>::new()) as Arc<dyn AnyBucket>
                    })),
                }
            };

            if erased.payload_type() != TypeId::of::<T>() {
                if erased.is_retired() {
                    continue;
                }
                return Err(BusError::PayloadMismatch {
                    channel: key.to_owned(),
                    expected: type_name::<T>(),
                    found: erased.payload_name(),
                });
            }

            let Ok(bucket) = erased.into_any().downcast::<Bucket<T>>() else {
                continue;
            };
            if bucket.insert(Arc::clone(&entry)) {
                return Ok(());
            }
        }
    }

    /// Removes every entry of `bucket` matching `pred`; retires the bucket if it
    /// ends up empty. Returns the number of entries removed.
    pub(crate) fn prune<T: 'static>(
        &self,
        key: &str,
        bucket: &Bucket<T>,
        pred: impl Fn(&Entry<T>) -> bool,
    ) -> usize {
        let mut state = bucket.state.lock();
        if state.retired {
            return 0;
        }
        let kept: Vec<_> = state
            .entries
            .iter()
            .filter(|e| !pred(e))
            .cloned()
            .collect();
        let removed = state.entries.len() - kept.len();
        if removed == 0 {
            return 0;
        }

        if kept.is_empty() {
            state.retired = true;
            state.entries = Vec::new().into();
            self.buckets.pin().remove(key);
            tracing::trace!(channel = key, registry = self.kind.as_label(), "bucket retired");
        } else {
            state.entries = kept.into();
        }
        removed
    }

    /// Looks up `key` and prunes matching entries. No-op on a missing key or a
    /// payload type mismatch.
    pub(crate) fn remove_where<T: 'static>(
        &self,
        key: &str,
        pred: impl Fn(&Entry<T>) -> bool,
    ) -> usize {
        match self.lookup::<T>(key) {
            Lookup::Found(bucket) => self.prune(key, &bucket, pred),
            Lookup::Missing | Lookup::Mismatch { .. } => 0,
        }
    }

    /// Drops the whole bucket for `key`, whatever its payload type.
    pub(crate) fn remove_key(&self, key: &str) -> usize {
        let map = self.buckets.pin();
        let Some(bucket) = map.get(key).map(Arc::clone) else {
            return 0;
        };
        let dropped = bucket.retire(&mut || {
            map.remove(key);
        });
        if dropped.is_some() {
            tracing::trace!(channel = key, registry = self.kind.as_label(), "bucket retired");
        }
        dropped.unwrap_or(0)
    }

    /// Number of live entries under `key` (any payload type).
    pub(crate) fn len_of(&self, key: &str) -> usize {
        self.buckets
            .pin()
            .get(key)
            .map(|bucket| bucket.len())
            .unwrap_or(0)
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.buckets.pin().keys().cloned().collect()
    }

    /// Drops every bucket. Returns the number of entries dropped.
    pub(crate) fn clear(&self) -> usize {
        self.keys().iter().map(|key| self.remove_key(key)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::{Listener, ListenerId, Priority};

    fn entry(id: u64, priority: Priority) -> Arc<Entry<u32>> {
        Arc::new(Entry::new(
            ListenerId(id),
            Listener::new(|_: &u32| {}),
            priority,
            None,
            false,
        ))
    }

    fn ids(registry: &Registry, key: &str) -> Vec<u64> {
        match registry.lookup::<u32>(key) {
            Lookup::Found(bucket) => bucket.snapshot().iter().map(|e| e.id.get()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_insert_keeps_tier_then_registration_order() {
        let reg = Registry::new(RegistryKind::Persistent);
        reg.insert("k", entry(1, Priority::Low)).unwrap();
        reg.insert("k", entry(2, Priority::Critical)).unwrap();
        reg.insert("k", entry(3, Priority::Normal)).unwrap();
        reg.insert("k", entry(4, Priority::Critical)).unwrap();
        reg.insert("k", entry(5, Priority::Background)).unwrap();
        reg.insert("k", entry(6, Priority::Low)).unwrap();

        assert_eq!(ids(&reg, "k"), vec![2, 4, 3, 1, 6, 5]);
    }

    #[test]
    fn test_payload_mismatch_is_rejected() {
        let reg = Registry::new(RegistryKind::Persistent);
        reg.insert("k", entry(1, Priority::Normal)).unwrap();

        let other = Arc::new(Entry::new(
            ListenerId(2),
            Listener::new(|_: &String| {}),
            Priority::Normal,
            None,
            false,
        ));
        let err = reg.insert("k", other).unwrap_err();
        assert_eq!(err.as_label(), "bus_payload_mismatch");
        assert!(matches!(reg.lookup::<String>("k"), Lookup::Mismatch { .. }));
    }

    #[test]
    fn test_empty_bucket_is_removed() {
        let reg = Registry::new(RegistryKind::Once);
        reg.insert("k", entry(1, Priority::Normal)).unwrap();
        reg.insert("k", entry(2, Priority::Normal)).unwrap();

        assert_eq!(reg.remove_where::<u32>("k", |e| e.id == ListenerId(1)), 1);
        assert_eq!(reg.keys(), vec!["k".to_string()]);
        assert_eq!(reg.remove_where::<u32>("k", |e| e.id == ListenerId(2)), 1);
        assert!(reg.keys().is_empty());
        assert!(matches!(reg.lookup::<u32>("k"), Lookup::Missing));
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let reg = Registry::new(RegistryKind::Persistent);
        reg.insert("k", entry(1, Priority::Normal)).unwrap();
        let Lookup::Found(bucket) = reg.lookup::<u32>("k") else {
            panic!("bucket expected");
        };
        let snap = bucket.snapshot();

        reg.insert("k", entry(2, Priority::Critical)).unwrap();
        reg.remove_where::<u32>("k", |e| e.id == ListenerId(1));

        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, ListenerId(1));
        assert_eq!(ids(&reg, "k"), vec![2]);
    }

    #[test]
    fn test_retired_bucket_is_replaced_on_insert() {
        let reg = Registry::new(RegistryKind::Persistent);
        reg.insert("k", entry(1, Priority::Normal)).unwrap();
        let Lookup::Found(stale) = reg.lookup::<u32>("k") else {
            panic!("bucket expected");
        };

        assert_eq!(reg.remove_key("k"), 1);
        assert!(!stale.insert(entry(2, Priority::Normal)));

        reg.insert("k", entry(3, Priority::Normal)).unwrap();
        assert_eq!(ids(&reg, "k"), vec![3]);
    }

    #[test]
    fn test_remove_on_missing_key_is_noop() {
        let reg = Registry::new(RegistryKind::Persistent);
        assert_eq!(reg.remove_where::<u32>("nope", |_| true), 0);
        assert_eq!(reg.remove_key("nope"), 0);
        assert_eq!(reg.clear(), 0);
    }
}
