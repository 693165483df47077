//! MemoryStore: transient backend with HashMap and version tokens
//!
//! This module implements the ComponentStore contract using:
//! - `HashMap<ComponentId, StoredComponent>` behind one `parking_lot::Mutex`
//! - `AtomicU64` for monotonically increasing version numbers
//!
//! # Design Notes
//!
//! - The mutex is held for the read-snapshot and the compare-and-commit
//!   step only, never while a caller's edit closure runs. The closure may
//!   be arbitrarily slow and may reenter the store.
//! - Version allocation happens before the write lock is taken.
//! - Equivalence sets are a plain shared value on each record; membership
//!   is computed on read by scanning for the value.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use partstore_core::{
    Component, ComponentId, ComponentStore, EditDecision, EditOutcome, Error, Result,
};
use partstore_search::{rank, FieldWeightScorer, Scorer};

/// A record plus its bookkeeping: version token and timestamps.
struct StoredComponent {
    component: Component,
    version: u64,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

/// Transient in-memory backend.
///
/// All records are held in a single keyed collection behind one coarse
/// lock. Conflict detection is strict: of two interleaved read-modify-write
/// cycles on the same id, exactly one commits.
pub struct MemoryStore {
    data: Mutex<HashMap<ComponentId, StoredComponent>>,
    version: AtomicU64,
    scorer: Box<dyn Scorer>,
}

impl MemoryStore {
    /// Create an empty store with the default ranking policy.
    pub fn new() -> Self {
        MemoryStore {
            data: Mutex::new(HashMap::new()),
            version: AtomicU64::new(0),
            scorer: Box::new(FieldWeightScorer::default()),
        }
    }

    /// Builder: replace the ranking policy used by `search`.
    pub fn with_scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Allocate the next version token atomically.
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// When the record was first inserted, if it exists.
    pub fn created_at(&self, id: ComponentId) -> Option<DateTime<Utc>> {
        self.data.lock().get(&id).map(|stored| stored.created)
    }

    /// When the record content last changed, if it exists.
    ///
    /// No-op edits do not move this timestamp.
    pub fn modified_at(&self, id: ComponentId) -> Option<DateTime<Utc>> {
        self.data.lock().get(&id).map(|stored| stored.updated)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore for MemoryStore {
    fn find_by_id(&self, id: ComponentId) -> Result<Option<Component>> {
        let data = self.data.lock();
        Ok(data.get(&id).map(|stored| stored.component.clone()))
    }

    fn edit_record(
        &self,
        id: ComponentId,
        update: &mut dyn FnMut(&mut Component) -> EditDecision,
    ) -> Result<EditOutcome> {
        let (mut draft, read_version) = {
            let data = self.data.lock();
            match data.get(&id) {
                Some(stored) => (stored.component.clone(), Some(stored.version)),
                None => (Component::new(id), None),
            }
        };
        let before = draft.clone();

        // No lock held from here until commit.
        if update(&mut draft) == EditDecision::Discard {
            return Ok(EditOutcome::Discarded);
        }
        if draft.id != id {
            return Err(Error::IdChanged {
                expected: id,
                actual: draft.id,
            });
        }
        // Grouping is owned by join_set/leave_set; whatever the closure did
        // to equiv_set is dropped before the content comparison.
        draft.equiv_set = before.equiv_set;
        if draft == before {
            debug!(id, "no need to store: no change");
            return Ok(EditOutcome::Unchanged);
        }

        let next = self.next_version();
        let now = Utc::now();
        let mut data = self.data.lock();
        match read_version {
            Some(read) => {
                // Records are never removed; an absent row still counts
                // as the record having moved under us.
                let Some(stored) = data.get_mut(&id) else {
                    return Err(Error::EditConflict(id));
                };
                if stored.version != read {
                    debug!(id, "discarding edit: concurrent modification");
                    return Err(Error::EditConflict(id));
                }
                // A join/leave may have moved the record since the read;
                // the live value wins over the snapshot.
                draft.equiv_set = stored.component.equiv_set;
                stored.component = draft;
                stored.version = next;
                stored.updated = now;
                Ok(EditOutcome::Committed)
            }
            None => {
                if data.contains_key(&id) {
                    debug!(id, "discarding edit: concurrent modification");
                    return Err(Error::EditConflict(id));
                }
                data.insert(
                    id,
                    StoredComponent {
                        component: draft,
                        version: next,
                        created: now,
                        updated: now,
                    },
                );
                Ok(EditOutcome::Committed)
            }
        }
    }

    fn join_set(&self, id: ComponentId, equiv_set: ComponentId) -> Result<()> {
        let mut data = self.data.lock();
        if let Some(stored) = data.get_mut(&id) {
            // Grouping is not a content edit: the version token stays put,
            // so in-flight edit_record commits are not aborted by this.
            stored.component.equiv_set = equiv_set;
        }
        Ok(())
    }

    fn leave_set(&self, id: ComponentId) -> Result<()> {
        let mut data = self.data.lock();
        if let Some(stored) = data.get_mut(&id) {
            stored.component.equiv_set = id;
        }
        Ok(())
    }

    fn matching_equiv_set(&self, id: ComponentId) -> Result<Vec<Component>> {
        let mut members: Vec<Component> = {
            let data = self.data.lock();
            let Some(stored) = data.get(&id) else {
                return Ok(vec![]);
            };
            let set = stored.component.equiv_set;
            data.values()
                .filter(|s| s.component.equiv_set == set)
                .map(|s| s.component.clone())
                .collect()
        };
        members.sort_by_key(|comp| (comp.equiv_set, comp.id));
        Ok(members)
    }

    fn search(&self, term: &str) -> Result<Vec<Component>> {
        let candidates: Vec<Component> = {
            let data = self.data.lock();
            data.values().map(|s| s.component.clone()).collect()
        };
        Ok(rank(candidates, term, self.scorer.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(store: &MemoryStore, id: ComponentId, value: &str, category: &str) {
        store
            .edit_record(id, &mut |comp| {
                comp.value = value.to_string();
                comp.category = category.to_string();
                EditDecision::Commit
            })
            .unwrap();
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }

    #[test]
    fn test_find_absent_returns_none() {
        let store = MemoryStore::new();
        assert!(store.find_by_id(1).unwrap().is_none());
    }

    #[test]
    fn test_edit_inserts_on_first_commit() {
        let store = MemoryStore::new();
        seed(&store, 1, "10k", "Resistor");
        let comp = store.find_by_id(1).unwrap().unwrap();
        assert_eq!(comp.value, "10k");
        assert_eq!(comp.equiv_set, 1);
    }

    #[test]
    fn test_returned_component_is_a_copy() {
        let store = MemoryStore::new();
        seed(&store, 1, "10k", "Resistor");
        let mut copy = store.find_by_id(1).unwrap().unwrap();
        copy.value = "mutated".into();
        assert_eq!(store.find_by_id(1).unwrap().unwrap().value, "10k");
    }

    #[test]
    fn test_noop_edit_does_not_touch_timestamps() {
        let store = MemoryStore::new();
        seed(&store, 1, "10k", "Resistor");
        let modified = store.modified_at(1).unwrap();

        let outcome = store.edit_record(1, &mut |_| EditDecision::Commit).unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(store.modified_at(1), Some(modified));
    }

    #[test]
    fn test_real_edit_moves_modified_not_created() {
        let store = MemoryStore::new();
        seed(&store, 1, "10k", "Resistor");
        let created = store.created_at(1).unwrap();

        seed(&store, 1, "10k 1%", "Resistor");
        assert_eq!(store.created_at(1), Some(created));
        assert!(store.modified_at(1).unwrap() >= created);
    }

    #[test]
    fn test_interleaved_edit_conflicts() {
        let store = MemoryStore::new();
        seed(&store, 1, "10k", "Resistor");

        // A full competing cycle runs while the outer edit holds its
        // snapshot; the lock is free, so this is legal reentrancy.
        let err = store
            .edit_record(1, &mut |comp| {
                store
                    .edit_record(1, &mut |inner| {
                        inner.notes = "winner".into();
                        EditDecision::Commit
                    })
                    .unwrap();
                comp.notes = "loser".into();
                EditDecision::Commit
            })
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.find_by_id(1).unwrap().unwrap().notes, "winner");
    }

    #[test]
    fn test_conflict_when_record_appears_during_edit() {
        let store = MemoryStore::new();

        let err = store
            .edit_record(1, &mut |comp| {
                store
                    .edit_record(1, &mut |inner| {
                        inner.value = "first".into();
                        EditDecision::Commit
                    })
                    .unwrap();
                comp.value = "second".into();
                EditDecision::Commit
            })
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.find_by_id(1).unwrap().unwrap().value, "first");
    }

    #[test]
    fn test_commit_preserves_concurrent_join() {
        let store = MemoryStore::new();
        seed(&store, 1, "10k", "Resistor");
        seed(&store, 2, "10k", "Resistor");

        store
            .edit_record(1, &mut |comp| {
                // Regrouping lands between this edit's read and its commit.
                store.join_set(1, 2).unwrap();
                comp.notes = "edited concurrently with a join".into();
                EditDecision::Commit
            })
            .unwrap();

        let comp = store.find_by_id(1).unwrap().unwrap();
        assert_eq!(comp.equiv_set, 2);
        assert_eq!(comp.notes, "edited concurrently with a join");
    }

    #[test]
    fn test_join_leave_missing_id_is_noop() {
        let store = MemoryStore::new();
        store.join_set(404, 2).unwrap();
        store.leave_set(404).unwrap();
        assert!(store.find_by_id(404).unwrap().is_none());
    }

    #[test]
    fn test_search_ranks_value_prefix_first() {
        let store = MemoryStore::new();
        seed(&store, 2, "R-10k-network", "R-Network");
        seed(&store, 1, "10k", "Resistor");
        seed(&store, 3, "100nF", "Capacitor (C)");

        let hits = store.search("10k").unwrap();
        let ids: Vec<ComponentId> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_search_with_custom_scorer() {
        struct CategoryOnly;
        impl Scorer for CategoryOnly {
            fn score(&self, term: &str, component: &Component) -> f32 {
                if component.category.contains(term) {
                    1.0
                } else {
                    0.0
                }
            }
            fn name(&self) -> &str {
                "category-only"
            }
        }

        let store = MemoryStore::new().with_scorer(Box::new(CategoryOnly));
        seed(&store, 1, "LED red", "Diode (D)");
        seed(&store, 2, "1N4148", "Diode (D)");

        let hits = store.search("Diode").unwrap();
        assert_eq!(hits.len(), 2);
        assert!(store.search("LED").unwrap().is_empty());
    }
}
