//! Defines [`TemporalGraph`], the entry point for building and querying a temporal graph.
//!
//! A graph is a cheap handle around a shared [`TemporalEdgeStore`] and the rayon pool used for
//! batch ingestion and parallel traversal. Cloning it shares both.
//!
//! # Examples
//!
//! ```rust
//! use tempus::prelude::*;
//!
//! let graph = TemporalGraph::new();
//! graph.add_edge(2010, 1, 2);
//! graph.add_edge(2012, 1, 3);
//!
//! assert!(graph.has_edge(2, 1, 2010));
//! assert_eq!(graph.vertices(2010..2013).len(), 3);
//! assert_eq!(graph.connected_components(2010..2013).len(), 1);
//! ```

use rayon::ThreadPool;
use std::{
    fmt::{Debug, Formatter},
    io::BufRead,
    ops::Range,
    path::Path,
    sync::Arc,
};
use tempus_api::core::entities::{Timestamp, VertexId};
use tempus_core::{
    entities::graph::tgraph::TemporalEdgeStore, storage::timeindex::TimeIndex,
};
use tracing::info;

use crate::{
    algorithms::components::{connected_components, ConnectedComponents},
    config::app_config::AppConfig,
    db::{
        api::{
            mutation::{batch::BatchStats, BatchOps},
            view::internal::CoreGraphOps,
        },
        task::{custom_pool, POOL},
    },
    errors::GraphError,
    io::updates::{read_update_file, read_updates, UpdateBatches},
};

#[derive(Clone)]
pub struct TemporalGraph {
    store: Arc<TemporalEdgeStore>,
    pool: Arc<ThreadPool>,
    parallel: bool,
}

impl Debug for TemporalGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalGraph")
            .field("timestamps", &self.store.len())
            .field("num_threads", &self.pool.current_num_threads())
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl Default for TemporalGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TemporalEdgeStore> for TemporalGraph {
    fn from(store: TemporalEdgeStore) -> Self {
        Self {
            store: Arc::new(store),
            pool: POOL.clone(),
            parallel: true,
        }
    }
}

impl TemporalGraph {
    /// An empty graph sharing the process wide pool
    pub fn new() -> Self {
        TemporalEdgeStore::new().into()
    }

    /// An empty graph with its own pool of `num_threads` workers
    pub fn with_threads(num_threads: usize) -> Result<Self, GraphError> {
        Ok(Self {
            store: Arc::new(TemporalEdgeStore::new()),
            pool: custom_pool(num_threads)?,
            parallel: true,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        let pool = match config.ingestion.num_threads {
            Some(n) => custom_pool(n)?,
            None => POOL.clone(),
        };
        Ok(Self {
            store: Arc::new(TemporalEdgeStore::new()),
            pool,
            parallel: config.ingestion.parallel,
        })
    }

    /// Build a graph from an update stream file. See [`TemporalGraph::load_from_reader`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let graph = Self::new();
        graph.ingest(read_update_file(path)?);
        Ok(graph)
    }

    /// Build a graph from an update stream. All `add` records are applied first, then all
    /// `delete` records. Reading stops at the first malformed record.
    pub fn load_from_reader<R: BufRead>(reader: R) -> Self {
        let graph = Self::new();
        graph.ingest(read_updates(reader));
        graph
    }

    /// Apply a parsed update stream to this graph, adds before deletes.
    pub fn ingest(&self, updates: UpdateBatches) -> (BatchStats, BatchStats) {
        let (added, deleted) = self.apply_updates(&updates);
        info!(
            added = added.applied,
            deleted = deleted.applied,
            skipped = updates.skipped,
            complete = updates.is_complete(),
            timestamps = self.num_timestamps(),
            "ingested update stream"
        );
        (added, deleted)
    }

    pub fn has_edge(&self, src: VertexId, dst: VertexId, t: Timestamp) -> bool {
        self.store.edge_exists(src, dst, t)
    }

    /// Best effort check for `src <-> dst` anywhere in `w`, see
    /// [`TemporalEdgeStore::edge_exists_window`].
    pub fn has_edge_window(&self, src: VertexId, dst: VertexId, w: Range<Timestamp>) -> bool {
        self.store.edge_exists_window(src, dst, w)
    }

    pub fn connected_components(&self, w: Range<Timestamp>) -> ConnectedComponents {
        connected_components(self, w)
    }

    pub fn time_index(&self) -> &TimeIndex {
        self.store.time_index()
    }

    /// Distinct timestamps holding at least one edge
    pub fn num_timestamps(&self) -> usize {
        self.store.len()
    }

    pub fn num_edges(&self) -> usize {
        self.store.num_edges()
    }

    pub fn edge_count_at(&self, t: Timestamp) -> usize {
        self.store.edge_count_at(t)
    }

    pub fn source_count_at(&self, t: Timestamp) -> usize {
        self.store.source_count_at(t)
    }

    pub fn destination_count_at(&self, t: Timestamp, src: VertexId) -> usize {
        self.store.destination_count_at(t, src)
    }

    pub fn memory_consumption(&self) -> usize {
        self.store.memory_consumption()
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl CoreGraphOps for TemporalGraph {
    #[inline]
    fn core_store(&self) -> &TemporalEdgeStore {
        &self.store
    }

    #[inline]
    fn thread_pool(&self) -> &ThreadPool {
        &self.pool
    }
}

impl BatchOps for TemporalGraph {
    fn parallel_ingestion(&self) -> bool {
        self.parallel
    }
}
