pub mod record;
pub mod registry;

pub use record::{Airport, FacilityKind, FacilityRecord, Ndb, Vor};
pub use registry::{AddOutcome, FacilityRegistry};

/// Counts reported after ingesting one provider facility delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: usize,
    pub skipped: usize,
    pub evicted: usize,
}

/// The three facility caches, one per [`FacilityKind`]
#[derive(Clone)]
pub struct FacilityRegistries {
    airports: FacilityRegistry,
    vors: FacilityRegistry,
    ndbs: FacilityRegistry,
}

impl FacilityRegistries {
    pub fn new(capacity: usize) -> Self {
        Self {
            airports: FacilityRegistry::new(capacity),
            vors: FacilityRegistry::new(capacity),
            ndbs: FacilityRegistry::new(capacity),
        }
    }

    pub fn get(&self, kind: FacilityKind) -> &FacilityRegistry {
        match kind {
            FacilityKind::Airport => &self.airports,
            FacilityKind::Vor => &self.vors,
            FacilityKind::Ndb => &self.ndbs,
        }
    }

    pub fn clear_all(&self) {
        for kind in FacilityKind::ALL {
            self.get(kind).clear();
        }
    }

    /// Add each record to the registry of its own kind
    ///
    /// Records with a blank identifier are dropped without being counted.
    pub fn ingest<I>(&self, records: I) -> IngestReport
    where
        I: IntoIterator<Item = FacilityRecord>,
    {
        let mut report = IngestReport::default();
        for record in records {
            if record.icao().trim().is_empty() {
                continue;
            }
            match self.get(record.kind()).add(record) {
                AddOutcome::Added => report.added += 1,
                AddOutcome::AddedWithEviction { .. } => {
                    report.added += 1;
                    report.evicted += 1;
                }
                AddOutcome::Skipped => report.skipped += 1,
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_routes_by_kind_and_counts() {
        let registries = FacilityRegistries::new(10);
        let report = registries.ingest(vec![
            FacilityRecord::airport("LIRF", 41.8, 12.2, 14.0),
            FacilityRecord::airport("LIRF", 41.8, 12.2, 14.0),
            FacilityRecord::vor("OST", 41.8, 12.2, 114_900_000, 8),
            FacilityRecord::ndb("URB", 41.9, 12.5, 345.0, 30.0),
            FacilityRecord::airport("", 0.0, 0.0, 0.0),
        ]);

        assert_eq!(
            report,
            IngestReport {
                added: 3,
                skipped: 1,
                evicted: 0
            }
        );
        assert_eq!(registries.get(FacilityKind::Airport).len(), 1);
        assert_eq!(registries.get(FacilityKind::Vor).len(), 1);
        assert_eq!(registries.get(FacilityKind::Ndb).len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let registries = FacilityRegistries::new(10);
        registries.ingest(vec![
            FacilityRecord::airport("LIRF", 41.8, 12.2, 14.0),
            FacilityRecord::vor("OST", 41.8, 12.2, 114_900_000, 8),
        ]);
        registries.clear_all();
        for kind in FacilityKind::ALL {
            assert!(registries.get(kind).is_empty());
        }
    }
}
