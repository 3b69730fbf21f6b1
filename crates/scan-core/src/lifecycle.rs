//! Tracks first/last-seen and resurfacing per entity, keyed by `entity_id`
//! (spec.md §4.8). Externalized behind [`LifecycleStore`] so the default
//! in-memory map can be swapped for a durable KV without changing callers
//! (spec.md §9).

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// The persisted lifecycle fields for one entity.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleRecord {
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub times_seen: u32,
    pub resurfaced: bool,
}

/// Process-wide (or externally durable) lifecycle state. `update` must
/// serialize concurrent calls for the same `entity_id`; distinct IDs may
/// update concurrently (spec.md §4.8, §5).
pub trait LifecycleStore: Send + Sync {
    fn update(&self, entity_id: &str, now: DateTime<Utc>) -> LifecycleRecord;
}

/// Default implementation: a single mutex guarding a hash map. Sufficient
/// at the scale of one pipeline worker; the mutex is coarse-grained but
/// correct, and the trait boundary is what allows a sharded or durable
/// store to be swapped in.
#[derive(Default)]
pub struct InMemoryLifecycleStore {
    records: Mutex<HashMap<String, LifecycleRecord>>,
}

impl InMemoryLifecycleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LifecycleStore for InMemoryLifecycleStore {
    fn update(&self, entity_id: &str, now: DateTime<Utc>) -> LifecycleRecord {
        let mut records = self.records.lock().expect("lifecycle store mutex poisoned");

        let record = match records.get(entity_id) {
            None => LifecycleRecord {
                first_seen: now,
                last_seen: now,
                times_seen: 1,
                resurfaced: false,
            },
            Some(prev) => LifecycleRecord {
                first_seen: prev.first_seen,
                last_seen: now,
                times_seen: prev.times_seen + 1,
                resurfaced: now > prev.last_seen,
            },
        };

        records.insert(entity_id.to_string(), record);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn first_sighting_is_not_resurfaced() {
        let store = InMemoryLifecycleStore::new();
        let now = Utc::now();
        let record = store.update("e1", now);
        assert_eq!(record.times_seen, 1);
        assert!(!record.resurfaced);
        assert_eq!(record.first_seen, now);
    }

    #[test]
    fn resighting_preserves_first_seen_and_bumps_times_seen() {
        let store = InMemoryLifecycleStore::new();
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(10);
        store.update("e1", t0);
        let record = store.update("e1", t1);
        assert_eq!(record.first_seen, t0);
        assert_eq!(record.last_seen, t1);
        assert_eq!(record.times_seen, 2);
        assert!(record.resurfaced);
    }

    #[test]
    fn distinct_entities_do_not_interfere() {
        let store = InMemoryLifecycleStore::new();
        let now = Utc::now();
        store.update("e1", now);
        let record = store.update("e2", now);
        assert_eq!(record.times_seen, 1);
    }
}
