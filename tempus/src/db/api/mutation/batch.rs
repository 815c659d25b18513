//! Batched edge updates.
//!
//! An [`EdgeBatch`] holds unordered `(source, destination, time)` records as three parallel
//! columns. Grouping turns it into a [`GroupedBatch`] keyed by timestamp, which is then
//! applied with one task per distinct timestamp so that no two tasks ever touch the same
//! timestamp of the store.

use itertools::izip;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::{
    iter::Sum,
    ops::{Add, AddAssign},
    time::Instant,
};
use tempus_api::core::{
    entities::{TemporalEdge, Timestamp, VertexId},
    EdgeOp,
};
use tempus_core::entities::graph::tgraph::TemporalEdgeStore;
use tracing::debug;

use crate::errors::GraphError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeBatch {
    op: EdgeOp,
    sources: Vec<VertexId>,
    destinations: Vec<VertexId>,
    times: Vec<Timestamp>,
}

impl EdgeBatch {
    pub fn new(op: EdgeOp) -> Self {
        Self {
            op,
            ..Default::default()
        }
    }

    pub fn with_capacity(op: EdgeOp, capacity: usize) -> Self {
        Self {
            op,
            sources: Vec::with_capacity(capacity),
            destinations: Vec::with_capacity(capacity),
            times: Vec::with_capacity(capacity),
        }
    }

    /// Build a batch from parallel columns, position `i` of each column forming one record.
    pub fn from_columns(
        op: EdgeOp,
        sources: Vec<VertexId>,
        destinations: Vec<VertexId>,
        times: Vec<Timestamp>,
    ) -> Result<Self, GraphError> {
        check_columns(&sources, &destinations, &times)?;
        Ok(Self {
            op,
            sources,
            destinations,
            times,
        })
    }

    pub fn from_edges<E: Into<TemporalEdge>>(op: EdgeOp, edges: impl IntoIterator<Item = E>) -> Self {
        let mut batch = Self::new(op);
        batch.extend(edges);
        batch
    }

    pub fn push(&mut self, src: VertexId, dst: VertexId, t: Timestamp) {
        self.sources.push(src);
        self.destinations.push(dst);
        self.times.push(t);
    }

    pub fn op(&self) -> EdgeOp {
        self.op
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn sources(&self) -> &[VertexId] {
        &self.sources
    }

    pub fn destinations(&self) -> &[VertexId] {
        &self.destinations
    }

    pub fn times(&self) -> &[Timestamp] {
        &self.times
    }

    pub fn iter(&self) -> impl Iterator<Item = TemporalEdge> + '_ {
        izip!(&self.sources, &self.destinations, &self.times)
            .map(|(src, dst, t)| TemporalEdge::new(*src, *dst, *t))
    }

    pub fn group(&self) -> GroupedBatch {
        GroupedBatch::from_edges(self.iter())
    }
}

impl<E: Into<TemporalEdge>> Extend<E> for EdgeBatch {
    fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
        for edge in iter {
            let edge = edge.into();
            self.push(edge.src, edge.dst, edge.time);
        }
    }
}

fn check_columns(
    sources: &[VertexId],
    destinations: &[VertexId],
    times: &[Timestamp],
) -> Result<(), GraphError> {
    if sources.len() != destinations.len() || sources.len() != times.len() {
        return Err(GraphError::ColumnLengthMismatch {
            sources: sources.len(),
            destinations: destinations.len(),
            times: times.len(),
        });
    }
    Ok(())
}

/// Outcome of applying a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// distinct timestamps in the batch
    pub timestamps: usize,
    /// records that changed the store
    pub applied: usize,
    /// records that were no-ops (duplicate inserts, deletes of absent edges)
    pub skipped: usize,
}

impl BatchStats {
    pub fn total(&self) -> usize {
        self.applied + self.skipped
    }

    fn record(&mut self, changed: bool) {
        if changed {
            self.applied += 1;
        } else {
            self.skipped += 1;
        }
    }
}

impl Add for BatchStats {
    type Output = BatchStats;

    fn add(self, rhs: Self) -> Self::Output {
        BatchStats {
            timestamps: self.timestamps + rhs.timestamps,
            applied: self.applied + rhs.applied,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

impl AddAssign for BatchStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for BatchStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(BatchStats::default(), Add::add)
    }
}

type SourceGroups = FxHashMap<VertexId, Vec<VertexId>>;

/// Records of a batch grouped as `time -> source -> destinations`.
///
/// Grouping is a plain reorganisation: records are kept in arrival order within a source and
/// are not deduplicated, neither against each other nor against the live store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedBatch {
    groups: FxHashMap<Timestamp, SourceGroups>,
    times: Vec<Timestamp>,
    len: usize,
}

impl GroupedBatch {
    pub fn from_columns(
        sources: &[VertexId],
        destinations: &[VertexId],
        times: &[Timestamp],
    ) -> Result<Self, GraphError> {
        check_columns(sources, destinations, times)?;
        Ok(Self::from_edges(
            izip!(sources, destinations, times)
                .map(|(src, dst, t)| TemporalEdge::new(*src, *dst, *t)),
        ))
    }

    pub fn from_edges(edges: impl IntoIterator<Item = TemporalEdge>) -> Self {
        let now = Instant::now();
        let mut grouped = Self::default();
        for edge in edges {
            grouped.insert_directed(edge.src, edge.dst, edge.time);
        }
        grouped.times = grouped.groups.keys().copied().collect();
        grouped.times.sort_unstable();
        debug!(
            records = grouped.len,
            timestamps = grouped.times.len(),
            "grouped batch in {:?}",
            now.elapsed()
        );
        grouped
    }

    fn insert_directed(&mut self, src: VertexId, dst: VertexId, t: Timestamp) {
        self.groups
            .entry(t)
            .or_default()
            .entry(src)
            .or_default()
            .push(dst);
        self.len += 1;
    }

    /// The distinct timestamps of the batch in ascending order; task `i` of [`Self::apply`]
    /// handles `times()[i]`.
    pub fn times(&self) -> &[Timestamp] {
        &self.times
    }

    pub fn num_times(&self) -> usize {
        self.times.len()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, t: Timestamp) -> Option<&FxHashMap<VertexId, Vec<VertexId>>> {
        self.groups.get(&t)
    }

    /// Records of one timestamp as `(source, destination)` pairs, in no particular order
    pub fn records_at(&self, t: Timestamp) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.groups
            .get(&t)
            .into_iter()
            .flat_map(|sources| {
                sources
                    .iter()
                    .flat_map(|(src, dsts)| dsts.iter().map(move |dst| (*src, *dst)))
            })
    }

    /// Apply every record to `store`, one task per distinct timestamp on the current rayon
    /// pool. Tasks for different timestamps run in no particular order; the call returns once
    /// all of them have finished.
    pub fn apply(&self, store: &TemporalEdgeStore, op: EdgeOp) -> BatchStats {
        let now = Instant::now();
        let stats = self
            .times
            .par_iter()
            .map(|t| self.apply_at(store, op, *t))
            .sum::<BatchStats>();
        debug!(
            %op,
            timestamps = stats.timestamps,
            applied = stats.applied,
            skipped = stats.skipped,
            "parallel batch took {:?}",
            now.elapsed()
        );
        stats
    }

    /// Single threaded equivalent of [`Self::apply`]
    pub fn apply_serial(&self, store: &TemporalEdgeStore, op: EdgeOp) -> BatchStats {
        let now = Instant::now();
        let stats = self
            .times
            .iter()
            .map(|t| self.apply_at(store, op, *t))
            .sum::<BatchStats>();
        debug!(
            %op,
            timestamps = stats.timestamps,
            applied = stats.applied,
            skipped = stats.skipped,
            "serial batch took {:?}",
            now.elapsed()
        );
        stats
    }

    fn apply_at(&self, store: &TemporalEdgeStore, op: EdgeOp, t: Timestamp) -> BatchStats {
        let mut stats = BatchStats {
            timestamps: 1,
            ..Default::default()
        };
        for (src, dst) in self.records_at(t) {
            let changed = match op {
                EdgeOp::Add => store.insert_undirected(src, dst, t),
                EdgeOp::Delete => store.delete_undirected(src, dst, t),
            };
            stats.record(changed);
        }
        stats
    }
}
