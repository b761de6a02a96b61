//! Lookup structures built once from the loaded registry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::{info, warn};

use college_model::CollegeRecord;
use college_normalization::normalize_state;

use crate::config::FuzzyIndexConfig;
use crate::error::{MatchError, Result};
use crate::fuzzy::{FuzzyHit, FuzzyIndex, WeightedFuzzyIndex};

/// Composite `(name, state)` lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameStateKey {
    pub name: String,
    pub state: String,
}

impl NameStateKey {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }
}

/// A record together with the searchable name that produced a lookup hit.
#[derive(Debug, Clone, Copy)]
pub struct NameHit<'a> {
    pub record: &'a Arc<CollegeRecord>,
    /// Index into the record's `searchable_names`.
    pub name_index: usize,
}

impl NameHit<'_> {
    pub fn name(&self) -> &str {
        &self.record.searchable_names()[self.name_index]
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    record: usize,
    name_index: usize,
}

/// Read-only registry index: exact and normalized lookups, state buckets and
/// the fuzzy index.
pub struct CollegeIndex {
    records: Vec<Arc<CollegeRecord>>,
    exact: HashMap<NameStateKey, Slot>,
    normalized: HashMap<NameStateKey, Slot>,
    by_state: HashMap<String, Vec<usize>>,
    fuzzy: Box<dyn FuzzyIndex>,
}

impl std::fmt::Debug for CollegeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollegeIndex")
            .field("records", &self.records.len())
            .field("exact_keys", &self.exact.len())
            .field("normalized_keys", &self.normalized.len())
            .field("states", &self.by_state.len())
            .finish_non_exhaustive()
    }
}

impl CollegeIndex {
    /// Build every lookup structure over `records`.
    ///
    /// Fails with [`MatchError::EmptyRegistry`] when there is nothing to index.
    pub fn build(records: Vec<CollegeRecord>, config: &FuzzyIndexConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(MatchError::EmptyRegistry);
        }
        let records: Vec<Arc<CollegeRecord>> = records.into_iter().map(Arc::new).collect();

        let mut exact = HashMap::new();
        let mut normalized = HashMap::new();
        let mut by_state: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            for (name_index, name) in record.searchable_names().iter().enumerate() {
                let slot = Slot {
                    record: position,
                    name_index,
                };
                insert_first(
                    &mut exact,
                    NameStateKey::new(name.as_str(), record.state()),
                    slot,
                    &records,
                    "exact",
                );
                insert_first(
                    &mut normalized,
                    NameStateKey::new(
                        record.normalized_names()[name_index].as_str(),
                        record.normalized_state(),
                    ),
                    slot,
                    &records,
                    "normalized",
                );
            }

            by_state
                .entry(record.state().to_string())
                .or_default()
                .push(position);
            if record.normalized_state() != record.state() {
                by_state
                    .entry(record.normalized_state().to_string())
                    .or_default()
                    .push(position);
            }
        }

        let fuzzy = Box::new(WeightedFuzzyIndex::new(&records, *config));

        info!(
            records = records.len(),
            exact_keys = exact.len(),
            normalized_keys = normalized.len(),
            state_buckets = by_state.len(),
            "built college index"
        );

        Ok(Self {
            records,
            exact,
            normalized,
            by_state,
            fuzzy,
        })
    }

    /// Replace the fuzzy index, e.g. with a different search backend.
    pub fn with_fuzzy_index(mut self, fuzzy: Box<dyn FuzzyIndex>) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn records(&self) -> &[Arc<CollegeRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, position: usize) -> Option<&Arc<CollegeRecord>> {
        self.records.get(position)
    }

    /// Lookup by searchable name and registry state, both as stored.
    pub fn lookup_exact(&self, name: &str, state: &str) -> Option<NameHit<'_>> {
        self.resolve_slot(self.exact.get(&NameStateKey::new(name, state)))
    }

    /// Lookup by normalized name and normalized state.
    pub fn lookup_normalized(&self, name: &str, state: &str) -> Option<NameHit<'_>> {
        self.resolve_slot(self.normalized.get(&NameStateKey::new(name, state)))
    }

    /// Records filed under any of `states`, in registry order, without
    /// duplicates.
    pub fn state_candidates(&self, states: &[&str]) -> Vec<&Arc<CollegeRecord>> {
        let mut positions: Vec<usize> = states
            .iter()
            .filter_map(|state| self.by_state.get(*state))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions.into_iter().map(|p| &self.records[p]).collect()
    }

    /// Number of distinct state buckets.
    pub fn state_bucket_count(&self) -> usize {
        self.by_state.len()
    }

    pub fn fuzzy_search(&self, query: &str) -> Vec<FuzzyHit> {
        self.fuzzy.search(query)
    }

    fn resolve_slot(&self, slot: Option<&Slot>) -> Option<NameHit<'_>> {
        slot.map(|slot| NameHit {
            record: &self.records[slot.record],
            name_index: slot.name_index,
        })
    }
}

/// Insert unless the key is taken; the earlier registry entry wins.
fn insert_first(
    map: &mut HashMap<NameStateKey, Slot>,
    key: NameStateKey,
    slot: Slot,
    records: &[Arc<CollegeRecord>],
    lookup: &'static str,
) {
    match map.entry(key) {
        Entry::Occupied(existing) => {
            let kept = &records[existing.get().record];
            let ignored = &records[slot.record];
            if kept.id() != ignored.id() {
                warn!(
                    lookup,
                    key_name = %existing.key().name,
                    key_state = %existing.key().state,
                    kept = kept.id(),
                    ignored = ignored.id(),
                    "duplicate lookup key"
                );
            }
        }
        Entry::Vacant(vacant) => {
            vacant.insert(slot);
        }
    }
}

/// The raw and normalized spelling of a query state, without duplicates.
pub(crate) fn state_variants(raw_state: &str) -> (String, Option<String>) {
    let normalized = normalize_state(raw_state);
    if normalized == raw_state {
        (normalized, None)
    } else {
        (raw_state.to_string(), Some(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use college_model::{CollegeDetails, CollegeType};

    fn record(id: &str, name: &str, previous: Option<&str>, state: &str) -> CollegeRecord {
        CollegeRecord::new(
            id,
            name,
            previous.map(str::to_string),
            CollegeDetails {
                address: String::new(),
                state: state.to_string(),
                college_type: CollegeType::Medical,
                management: None,
                university_affiliation: None,
            },
        )
    }

    fn sample_index() -> CollegeIndex {
        CollegeIndex::build(
            vec![
                record(
                    "KA-1",
                    "MYSORE MEDICAL COLLEGE AND RESEARCH INSTITUTE",
                    Some("GOVERNMENT MEDICAL COLLEGE"),
                    "KARNATAKA",
                ),
                record("DL-1", "VARDHMAN MAHAVIR MEDICAL COLLEGE", None, "Delhi"),
                record("DL-2", "Govt. Dental College", None, "NEW DELHI"),
            ],
            &FuzzyIndexConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(matches!(
            CollegeIndex::build(Vec::new(), &FuzzyIndexConfig::default()),
            Err(MatchError::EmptyRegistry)
        ));
    }

    #[test]
    fn exact_lookup_covers_every_searchable_name() {
        let index = sample_index();
        let hit = index
            .lookup_exact("GOVERNMENT MEDICAL COLLEGE", "KARNATAKA")
            .unwrap();
        assert_eq!(hit.record.id(), "KA-1");
        assert_eq!(hit.name(), "GOVERNMENT MEDICAL COLLEGE");
        assert!(index.lookup_exact("GOVERNMENT MEDICAL COLLEGE", "GOA").is_none());
        assert!(index
            .lookup_exact("VARDHMAN MAHAVIR MEDICAL COLLEGE", "Delhi")
            .is_some());
    }

    #[test]
    fn normalized_lookup_uses_normalized_state() {
        let index = sample_index();
        let hit = index
            .lookup_normalized("GOVERNMENT DENTAL COLLEGE", "NEW DELHI")
            .unwrap();
        assert_eq!(hit.record.id(), "DL-2");
        assert_eq!(hit.name(), "Govt. Dental College");
        assert!(index
            .lookup_normalized("VARDHMAN MAHAVIR MEDICAL COLLEGE", "NEW DELHI")
            .is_some());
    }

    #[test]
    fn records_are_filed_under_raw_and_normalized_state() {
        let index = sample_index();
        let ids = |states: &[&str]| -> Vec<String> {
            index
                .state_candidates(states)
                .iter()
                .map(|r| r.id().to_string())
                .collect()
        };
        assert_eq!(ids(&["Delhi"]), ["DL-1"]);
        assert_eq!(ids(&["NEW DELHI"]), ["DL-1", "DL-2"]);
        assert_eq!(ids(&["Delhi", "NEW DELHI"]), ["DL-1", "DL-2"]);
        assert!(ids(&["NOWHERESTAN"]).is_empty());
        assert_eq!(index.state_bucket_count(), 3);
    }

    #[test]
    fn state_variants_skip_duplicates() {
        assert_eq!(state_variants("KARNATAKA"), ("KARNATAKA".to_string(), None));
        assert_eq!(
            state_variants("Delhi"),
            ("Delhi".to_string(), Some("NEW DELHI".to_string()))
        );
    }
}
