//! The temporal edge store: `time -> source -> {destinations}`.
//!
//! Both levels are sharded concurrent maps. Mutations of one undirected edge are applied
//! while holding the outer entry of its timestamp, which makes the existence check, the two
//! directed writes and the cleanup of emptied nodes a single critical section for that
//! timestamp. Different timestamps proceed independently.
//!
//! Reads across several timestamps (anything taking a window) first snapshot the
//! [`TimeIndex`] and then visit the timestamps one at a time. They are not isolated from
//! concurrent writers: a window read may observe a batch half applied, and a timestamp
//! removed between the snapshot and the visit is skipped.

use dashmap::mapref::{entry::Entry, one::Ref};
use rustc_hash::FxHashSet;
use std::{collections::BTreeSet, mem::size_of, ops::Range};
use tempus_api::core::{
    entities::{Timestamp, VertexId},
    storage::FxDashMap,
};
use tracing::trace;

use crate::storage::timeindex::TimeIndex;

/// Destinations of one source at one timestamp
pub type Destinations = BTreeSet<VertexId>;

/// Adjacency of all sources at one timestamp
pub type SourceMap = FxDashMap<VertexId, Destinations>;

#[derive(Debug, Default)]
pub struct TemporalEdgeStore {
    edges: FxDashMap<Timestamp, SourceMap>,
    time_index: TimeIndex,
}

impl TemporalEdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose outer map uses (at least) `num_shards` lock shards.
    pub fn with_shards(num_shards: usize) -> Self {
        let num_shards = num_shards.max(2).next_power_of_two();
        Self {
            edges: FxDashMap::with_hasher_and_shard_amount(Default::default(), num_shards),
            time_index: TimeIndex::new(),
        }
    }

    /// Insert the undirected edge `src <-> dst` at `t`.
    ///
    /// Returns `false` and leaves the store untouched if the edge is already present.
    pub fn insert_undirected(&self, src: VertexId, dst: VertexId, t: Timestamp) -> bool {
        match self.edges.entry(t) {
            Entry::Occupied(entry) => {
                let sources = entry.get();
                if contains_directed(sources, src, dst) {
                    return false;
                }
                insert_directed(sources, src, dst);
                insert_directed(sources, dst, src);
            }
            Entry::Vacant(entry) => {
                let sources = SourceMap::default();
                insert_directed(&sources, src, dst);
                insert_directed(&sources, dst, src);
                self.time_index.insert(t);
                entry.insert(sources);
                trace!(time = t, "new timestamp");
            }
        }
        true
    }

    /// Delete the undirected edge `src <-> dst` at `t`.
    ///
    /// Sources left without destinations are dropped, and so is the timestamp once it has no
    /// sources left (both from the map and from the time index). Returns `false` if the edge
    /// was not present.
    pub fn delete_undirected(&self, src: VertexId, dst: VertexId, t: Timestamp) -> bool {
        let Entry::Occupied(entry) = self.edges.entry(t) else {
            return false;
        };
        let sources = entry.get();
        if !contains_directed(sources, src, dst) {
            return false;
        }
        remove_directed(sources, src, dst);
        remove_directed(sources, dst, src);
        if sources.is_empty() {
            self.time_index.remove(t);
            entry.remove();
            trace!(time = t, "timestamp emptied");
        }
        true
    }

    pub fn edge_exists(&self, src: VertexId, dst: VertexId, t: Timestamp) -> bool {
        self.edges
            .get(&t)
            .is_some_and(|sources| contains_directed(&sources, src, dst))
    }

    /// Checks whether `src <-> dst` exists at any timestamp in `w`, stopping at the first hit.
    ///
    /// Best effort only: timestamps are visited one after the other, so the answer can be
    /// stale if the window is being mutated concurrently.
    pub fn edge_exists_window(&self, src: VertexId, dst: VertexId, w: Range<Timestamp>) -> bool {
        self.time_index
            .range(w)
            .into_iter()
            .any(|t| self.edge_exists(src, dst, t))
    }

    /// Read access to the adjacency of one timestamp.
    ///
    /// The returned guard holds a read lock on a shard of the outer map; writers of any
    /// timestamp in that shard wait until it is dropped. Do not mutate the store while holding it.
    pub fn sources_at(&self, t: Timestamp) -> Option<Ref<'_, Timestamp, SourceMap>> {
        self.edges.get(&t)
    }

    /// Ordered destinations of `src` at `t`
    pub fn destinations(&self, t: Timestamp, src: VertexId) -> Vec<VertexId> {
        self.edges
            .get(&t)
            .and_then(|sources| {
                sources
                    .get(&src)
                    .map(|dsts| dsts.iter().copied().collect())
            })
            .unwrap_or_default()
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    /// Number of distinct timestamps holding at least one edge
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of undirected edges over all timestamps, self loops counted once.
    pub fn num_edges(&self) -> usize {
        self.edges
            .iter()
            .map(|sources| {
                sources
                    .iter()
                    .map(|entry| entry.value().range(*entry.key()..).count())
                    .sum::<usize>()
            })
            .sum()
    }

    /// Number of directed entries stored at `t`. An undirected edge between two distinct
    /// vertices contributes two.
    pub fn edge_count_at(&self, t: Timestamp) -> usize {
        self.edges
            .get(&t)
            .map(|sources| sources.iter().map(|entry| entry.value().len()).sum())
            .unwrap_or(0)
    }

    /// Number of sources with at least one destination at `t`
    pub fn source_count_at(&self, t: Timestamp) -> usize {
        self.edges.get(&t).map(|sources| sources.len()).unwrap_or(0)
    }

    pub fn destination_count_at(&self, t: Timestamp, src: VertexId) -> usize {
        self.edges
            .get(&t)
            .and_then(|sources| sources.get(&src).map(|dsts| dsts.len()))
            .unwrap_or(0)
    }

    /// Rough payload size in bytes: three words per stored directed triple.
    pub fn memory_consumption(&self) -> usize {
        let triple = size_of::<Timestamp>() + 2 * size_of::<VertexId>();
        self.edges
            .iter()
            .map(|sources| {
                sources
                    .iter()
                    .map(|entry| entry.value().len() * triple)
                    .sum::<usize>()
            })
            .sum()
    }

    /// Checks the structural invariants of the store: every directed entry has its mirror,
    /// there are no empty sources or timestamps, and the time index matches the stored
    /// timestamps.
    ///
    /// Only meaningful while no mutation is in flight.
    pub fn is_consistent(&self) -> bool {
        let mut times = Vec::with_capacity(self.edges.len());
        for sources in self.edges.iter() {
            if sources.is_empty() {
                return false;
            }
            let mut directed = FxHashSet::default();
            for entry in sources.iter() {
                let (src, dsts) = entry.pair();
                if dsts.is_empty() {
                    return false;
                }
                directed.extend(dsts.iter().map(|dst| (*src, *dst)));
            }
            if !directed.iter().all(|(s, d)| directed.contains(&(*d, *s))) {
                return false;
            }
            times.push(*sources.key());
        }
        times.sort_unstable();
        times == self.time_index.snapshot()
    }
}

#[inline]
fn contains_directed(sources: &SourceMap, src: VertexId, dst: VertexId) -> bool {
    sources.get(&src).is_some_and(|dsts| dsts.contains(&dst))
}

#[inline]
fn insert_directed(sources: &SourceMap, src: VertexId, dst: VertexId) {
    sources.entry(src).or_default().insert(dst);
}

#[inline]
fn remove_directed(sources: &SourceMap, src: VertexId, dst: VertexId) {
    sources.remove_if_mut(&src, |_, dsts| {
        dsts.remove(&dst);
        dsts.is_empty()
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rayon::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn insert_is_symmetric() {
        let store = TemporalEdgeStore::new();
        assert!(store.insert_undirected(1, 2, 2010));

        assert!(store.edge_exists(1, 2, 2010));
        assert!(store.edge_exists(2, 1, 2010));
        assert!(!store.edge_exists(1, 2, 2011));
        assert!(store.time_index().contains(2010));
        assert!(store.is_consistent());
    }

    #[test]
    fn delete_is_symmetric() {
        let store = TemporalEdgeStore::new();
        store.insert_undirected(1, 2, 2010);
        store.insert_undirected(1, 3, 2010);

        assert!(store.delete_undirected(2, 1, 2010));
        assert!(!store.edge_exists(1, 2, 2010));
        assert!(!store.edge_exists(2, 1, 2010));
        assert!(store.edge_exists(3, 1, 2010));
        assert!(store.is_consistent());
    }

    #[test]
    fn insert_is_idempotent() {
        let store = TemporalEdgeStore::new();
        assert!(store.insert_undirected(4, 5, 1));
        assert!(!store.insert_undirected(4, 5, 1));
        assert!(!store.insert_undirected(5, 4, 1));

        assert_eq!(store.destinations(1, 4), vec![5]);
        assert_eq!(store.destinations(1, 5), vec![4]);
        assert_eq!(store.edge_count_at(1), 2);
        assert_eq!(store.num_edges(), 1);
    }

    #[test]
    fn deleting_absent_edges_is_a_no_op() {
        let store = TemporalEdgeStore::new();
        assert!(!store.delete_undirected(1, 2, 3));

        store.insert_undirected(1, 2, 3);
        assert!(!store.delete_undirected(1, 9, 3));
        assert!(!store.delete_undirected(1, 2, 4));
        assert!(store.edge_exists(1, 2, 3));
        assert!(store.is_consistent());
    }

    #[test]
    fn cleanup_cascades_to_time_index() {
        let store = TemporalEdgeStore::new();
        store.insert_undirected(1, 2, 7);
        store.insert_undirected(1, 3, 7);
        assert_eq!(store.source_count_at(7), 3);
        assert_eq!(store.destination_count_at(7, 1), 2);

        store.delete_undirected(1, 2, 7);
        // 2 lost its only destination, 1 still has 3
        assert_eq!(store.source_count_at(7), 2);
        assert_eq!(store.destination_count_at(7, 2), 0);
        assert_eq!(store.destination_count_at(7, 1), 1);
        assert!(store.time_index().contains(7));

        store.delete_undirected(3, 1, 7);
        assert_eq!(store.len(), 0);
        assert!(store.sources_at(7).is_none());
        assert!(!store.time_index().contains(7));
        assert!(store.is_empty());
        assert!(store.is_consistent());
    }

    #[test]
    fn self_loops() {
        let store = TemporalEdgeStore::new();
        assert!(store.insert_undirected(3, 3, 0));
        assert!(!store.insert_undirected(3, 3, 0));
        assert_eq!(store.edge_count_at(0), 1);
        assert_eq!(store.num_edges(), 1);

        assert!(store.delete_undirected(3, 3, 0));
        assert!(store.is_empty());
        assert!(store.time_index().is_empty());
    }

    #[test]
    fn window_existence() {
        let store = TemporalEdgeStore::new();
        store.insert_undirected(1, 2, 2010);
        store.insert_undirected(1, 3, 2012);

        assert!(store.edge_exists_window(1, 3, 2010..2013));
        assert!(store.edge_exists_window(3, 1, 2012..2013));
        assert!(!store.edge_exists_window(1, 3, 2010..2012));
        assert!(!store.edge_exists_window(2, 3, 0..u64::MAX));
        assert!(!store.edge_exists_window(1, 2, 2010..2010));
    }

    #[test]
    fn counters_and_memory() {
        let store = TemporalEdgeStore::with_shards(3);
        store.insert_undirected(1, 2, 1);
        store.insert_undirected(2, 3, 1);
        store.insert_undirected(1, 2, 2);

        assert_eq!(store.len(), 2);
        assert_eq!(store.edge_count_at(1), 4);
        assert_eq!(store.edge_count_at(2), 2);
        assert_eq!(store.edge_count_at(3), 0);
        assert_eq!(store.source_count_at(1), 3);
        assert_eq!(store.destination_count_at(1, 2), 2);
        assert_eq!(store.num_edges(), 3);
        assert_eq!(store.memory_consumption(), 6 * 24);
    }

    #[test]
    fn concurrent_mutation_of_shared_timestamps() {
        let store = TemporalEdgeStore::new();
        let edges: Vec<(u64, u64, u64)> = (0..2000u64).map(|i| (i % 37, i % 41, i % 5)).collect();

        edges.par_iter().for_each(|(s, d, t)| {
            store.insert_undirected(*s, *d, *t);
        });
        assert!(store.is_consistent());
        for (s, d, t) in edges.iter() {
            assert!(store.edge_exists(*d, *s, *t));
        }

        edges.par_iter().for_each(|(s, d, t)| {
            store.delete_undirected(*d, *s, *t);
        });
        assert!(store.is_empty());
        assert!(store.time_index().is_empty());
    }

    #[test]
    fn racing_insert_and_delete_keep_symmetry() {
        let store = TemporalEdgeStore::new();
        (0..10_000u64).into_par_iter().for_each(|i| {
            if i % 2 == 0 {
                store.insert_undirected(1, 2, i % 3);
            } else {
                store.delete_undirected(2, 1, i % 3);
            }
        });
        assert!(store.is_consistent());
        for t in 0..3 {
            assert_eq!(store.edge_exists(1, 2, t), store.edge_exists(2, 1, t));
        }
    }

    fn normalise(s: u64, d: u64, t: u64) -> (u64, u64, u64) {
        (t, s.min(d), s.max(d))
    }

    proptest! {
        #[test]
        fn matches_set_model(ops in proptest::collection::vec((any::<bool>(), 0u64..8, 0u64..8, 0u64..4), 0..200)) {
            let store = TemporalEdgeStore::new();
            let mut model = BTreeSet::new();
            for (insert, s, d, t) in ops {
                if insert {
                    prop_assert_eq!(store.insert_undirected(s, d, t), model.insert(normalise(s, d, t)));
                } else {
                    prop_assert_eq!(store.delete_undirected(s, d, t), model.remove(&normalise(s, d, t)));
                }
            }
            prop_assert!(store.is_consistent());
            prop_assert_eq!(store.num_edges(), model.len());
            let times: BTreeSet<u64> = model.iter().map(|(t, _, _)| *t).collect();
            prop_assert_eq!(store.time_index().snapshot(), times.into_iter().collect::<Vec<_>>());
            for (t, s, d) in model {
                prop_assert!(store.edge_exists(s, d, t));
                prop_assert!(store.edge_exists(d, s, t));
            }
        }
    }
}
