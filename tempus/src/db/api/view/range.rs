//! Windowed traversal of the edge store.
//!
//! All traversals take a half-open window `start..end` of timestamps and resolve it against
//! a snapshot of the time index taken when the call starts. Visitors are called while a read
//! guard on the visited timestamp is held and must not mutate the graph.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{collections::BTreeMap, ops::Range};
use tempus_api::core::{
    entities::{Timestamp, VertexId},
    storage::FxDashSet,
};
use tempus_core::entities::graph::tgraph::{Destinations, SourceMap};

use crate::db::api::view::internal::CoreGraphOps;

pub trait RangeOps: CoreGraphOps + Sync {
    /// Visit the adjacency of every timestamp in `w`, in ascending time order.
    fn for_each_time<F>(&self, w: Range<Timestamp>, mut f: F)
    where
        F: FnMut(Timestamp, &SourceMap),
    {
        let store = self.core_store();
        for t in store.time_index().range(w) {
            if let Some(sources) = store.sources_at(t) {
                f(t, &sources);
            }
        }
    }

    /// Visit the adjacency of every timestamp in `w` on the graph's pool, one task per
    /// timestamp. Returns once every timestamp has been visited.
    fn par_for_each_time<F>(&self, w: Range<Timestamp>, f: F)
    where
        F: Fn(Timestamp, &SourceMap) + Send + Sync,
    {
        let store = self.core_store();
        let times = store.time_index().range(w);
        self.thread_pool().install(|| {
            times.par_iter().for_each(|t| {
                if let Some(sources) = store.sources_at(*t) {
                    f(*t, &sources);
                }
            })
        });
    }

    fn for_each_source<F>(&self, w: Range<Timestamp>, mut f: F)
    where
        F: FnMut(Timestamp, VertexId, &Destinations),
    {
        self.for_each_time(w, |t, sources| {
            for entry in sources.iter() {
                f(t, *entry.key(), entry.value());
            }
        });
    }

    fn par_for_each_source<F>(&self, w: Range<Timestamp>, f: F)
    where
        F: Fn(Timestamp, VertexId, &Destinations) + Send + Sync,
    {
        self.par_for_each_time(w, |t, sources| {
            for entry in sources.iter() {
                f(t, *entry.key(), entry.value());
            }
        });
    }

    /// Visit every directed entry `(time, source, destination)` in `w`. Each undirected edge
    /// between distinct vertices is seen from both ends.
    fn for_each_edge<F>(&self, w: Range<Timestamp>, mut f: F)
    where
        F: FnMut(Timestamp, VertexId, VertexId),
    {
        self.for_each_source(w, |t, src, dsts| {
            for dst in dsts {
                f(t, src, *dst);
            }
        });
    }

    fn par_for_each_edge<F>(&self, w: Range<Timestamp>, f: F)
    where
        F: Fn(Timestamp, VertexId, VertexId) + Send + Sync,
    {
        self.par_for_each_source(w, |t, src, dsts| {
            for dst in dsts {
                f(t, src, *dst);
            }
        });
    }

    /// Every vertex with at least one edge in `w`
    fn vertices(&self, w: Range<Timestamp>) -> FxHashSet<VertexId> {
        let vertices = FxDashSet::default();
        self.par_for_each_source(w, |_, src, _| {
            vertices.insert(src);
        });
        vertices.into_iter().collect()
    }

    /// Destinations of `src` in `w`, keyed by the timestamp they were recorded at. Timestamps
    /// where `src` has no edge are left out.
    fn neighbours(&self, w: Range<Timestamp>, src: VertexId) -> BTreeMap<Timestamp, Vec<VertexId>> {
        let store = self.core_store();
        store
            .time_index()
            .range(w)
            .into_iter()
            .filter_map(|t| {
                let dsts = store.destinations(t, src);
                (!dsts.is_empty()).then_some((t, dsts))
            })
            .collect()
    }

    /// Distinct neighbours of `src` over the whole window
    fn neighbour_set(&self, w: Range<Timestamp>, src: VertexId) -> FxHashSet<VertexId> {
        self.neighbours(w, src).into_values().flatten().collect()
    }

    /// All directed entries in `w` in time order, sources and destinations ascending within a
    /// timestamp.
    fn edges_window(&self, w: Range<Timestamp>) -> Vec<(Timestamp, VertexId, VertexId)> {
        let mut edges = vec![];
        self.for_each_time(w, |t, sources| {
            let start = edges.len();
            for entry in sources.iter() {
                let src = *entry.key();
                edges.extend(entry.value().iter().map(|dst| (t, src, *dst)));
            }
            edges[start..].sort_unstable();
        });
        edges
    }
}

impl<G: CoreGraphOps + Sync + ?Sized> RangeOps for G {}
