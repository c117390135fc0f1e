use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::FacilityRecord;
use crate::constants::DEFAULT_FACILITY_CAPACITY;

/// Result of offering a record to a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Added after dropping the oldest record to stay within capacity
    AddedWithEviction { evicted: String },
    /// Identifier already present; nothing changed
    Skipped,
}

impl AddOutcome {
    pub fn was_added(&self) -> bool {
        !matches!(self, AddOutcome::Skipped)
    }
}

struct Entries {
    order: VecDeque<FacilityRecord>,
    ids: HashSet<String>,
}

/// Bounded, insertion-ordered facility cache keyed by ICAO identifier
///
/// Eviction is FIFO: when an insert would bring the count to `capacity`,
/// the oldest record is dropped first. Lookups never refresh a record's
/// position. All operations take the internal lock, so the provider
/// callback thread may add while the control thread snapshots.
#[derive(Clone)]
pub struct FacilityRegistry {
    capacity: usize,
    entries: Arc<RwLock<Entries>>,
}

impl FacilityRegistry {
    pub fn new(capacity: usize) -> Self {
        let reserve = capacity.min(DEFAULT_FACILITY_CAPACITY);
        Self {
            capacity,
            entries: Arc::new(RwLock::new(Entries {
                order: VecDeque::with_capacity(reserve),
                ids: HashSet::with_capacity(reserve),
            })),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `record` unless its identifier is already held
    pub fn add(&self, record: FacilityRecord) -> AddOutcome {
        let mut entries = self.write();

        if entries.ids.contains(record.icao()) {
            return AddOutcome::Skipped;
        }

        let mut evicted = None;
        if entries.order.len() + 1 >= self.capacity
            && let Some(oldest) = entries.order.pop_front()
        {
            entries.ids.remove(oldest.icao());
            evicted = Some(oldest.icao().to_string());
        }

        entries.ids.insert(record.icao().to_string());
        entries.order.push_back(record);

        match evicted {
            Some(evicted) => AddOutcome::AddedWithEviction { evicted },
            None => AddOutcome::Added,
        }
    }

    pub fn clear(&self) {
        let mut entries = self.write();
        entries.order.clear();
        entries.ids.clear();
    }

    pub fn exists(&self, icao: &str) -> bool {
        self.read().ids.contains(icao)
    }

    /// Oldest-first copy of the held records
    pub fn snapshot(&self) -> Vec<FacilityRecord> {
        self.read().order.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().order.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(icao: &str) -> FacilityRecord {
        FacilityRecord::airport(icao, 41.8, 12.2, 10.0)
    }

    fn ids(registry: &FacilityRegistry) -> Vec<String> {
        registry
            .snapshot()
            .iter()
            .map(|r| r.icao().to_string())
            .collect()
    }

    #[test]
    fn test_duplicate_is_skipped() {
        let registry = FacilityRegistry::new(10);
        assert_eq!(registry.add(airport("LIRF")), AddOutcome::Added);
        assert_eq!(registry.add(airport("LIRF")), AddOutcome::Skipped);
        assert_eq!(registry.len(), 1);
        assert!(registry.exists("LIRF"));
        assert!(!registry.exists("LIRA"));
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let registry = FacilityRegistry::new(10);
        for icao in ["LIRF", "LIRA", "LIRU", "LIRE"] {
            registry.add(airport(icao));
        }
        assert_eq!(ids(&registry), vec!["LIRF", "LIRA", "LIRU", "LIRE"]);
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let registry = FacilityRegistry::new(4);
        registry.add(airport("A001"));
        registry.add(airport("A002"));
        registry.add(airport("A003"));
        assert_eq!(registry.len(), 3);

        // count + 1 reaches capacity: the oldest goes first
        assert_eq!(
            registry.add(airport("A004")),
            AddOutcome::AddedWithEviction {
                evicted: "A001".to_string()
            }
        );
        assert_eq!(ids(&registry), vec!["A002", "A003", "A004"]);
        assert!(!registry.exists("A001"));
    }

    #[test]
    fn test_lookup_does_not_refresh_age() {
        let registry = FacilityRegistry::new(3);
        registry.add(airport("A001"));
        registry.add(airport("A002"));
        assert!(registry.exists("A001"));
        assert_eq!(registry.add(airport("A001")), AddOutcome::Skipped);

        registry.add(airport("A003"));
        assert_eq!(ids(&registry), vec!["A002", "A003"]);
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let registry = FacilityRegistry::new(500);
        for i in 0..2000 {
            registry.add(airport(&format!("K{:04}", i % 1500)));
            assert!(registry.len() <= registry.capacity());
        }
    }

    #[test]
    fn test_evicted_identifier_can_return() {
        let registry = FacilityRegistry::new(3);
        registry.add(airport("A001"));
        registry.add(airport("A002"));
        registry.add(airport("A003"));
        assert!(!registry.exists("A001"));
        assert!(registry.add(airport("A001")).was_added());
        assert_eq!(ids(&registry), vec!["A003", "A001"]);
    }

    #[test]
    fn test_clear() {
        let registry = FacilityRegistry::new(10);
        registry.add(airport("LIRF"));
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.exists("LIRF"));
        assert_eq!(registry.add(airport("LIRF")), AddOutcome::Added);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let registry = FacilityRegistry::new(50);
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        registry.add(airport(&format!("T{}{:03}", t, i)));
                    }
                })
            })
            .collect();
        let reader = {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = registry.snapshot();
                    assert!(snapshot.len() <= 50);
                }
            })
        };
        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();
        assert!(registry.len() <= 50);
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        let registry = FacilityRegistry::new(usize::MAX);
        assert_eq!(registry.add(airport("LIRF")), AddOutcome::Added);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.capacity(), usize::MAX);
    }
}
