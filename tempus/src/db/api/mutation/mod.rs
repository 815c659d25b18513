use std::time::Instant;
use tempus_api::core::{
    entities::{TemporalEdge, Timestamp, VertexId},
    EdgeOp,
};
use tracing::info;

use crate::{
    db::api::{
        mutation::batch::{BatchStats, EdgeBatch, GroupedBatch},
        view::internal::CoreGraphOps,
    },
    io::updates::UpdateBatches,
};

pub mod batch;

/// Batch ingestion on top of a graph's store and pool.
pub trait BatchOps: CoreGraphOps {
    /// Whether batches are applied with one task per timestamp on [`CoreGraphOps::thread_pool`]
    /// or on the calling thread.
    fn parallel_ingestion(&self) -> bool {
        true
    }

    fn apply_grouped(&self, grouped: &GroupedBatch, op: EdgeOp) -> BatchStats {
        let store = self.core_store();
        if self.parallel_ingestion() {
            self.thread_pool().install(|| grouped.apply(store, op))
        } else {
            grouped.apply_serial(store, op)
        }
    }

    fn apply_batch(&self, batch: &EdgeBatch) -> BatchStats {
        let now = Instant::now();
        let stats = self.apply_grouped(&batch.group(), batch.op());
        info!(
            op = %batch.op(),
            records = batch.len(),
            timestamps = stats.timestamps,
            applied = stats.applied,
            "applied batch in {:?}",
            now.elapsed()
        );
        stats
    }

    /// Apply the add batch of `updates` and then its delete batch.
    fn apply_updates(&self, updates: &UpdateBatches) -> (BatchStats, BatchStats) {
        (
            self.apply_batch(&updates.additions),
            self.apply_batch(&updates.deletions),
        )
    }
}

pub trait AdditionOps: BatchOps {
    /// Add the undirected edge `src <-> dst` at time `t`. Returns `false` if it was already there.
    fn add_edge(&self, t: Timestamp, src: VertexId, dst: VertexId) -> bool {
        self.core_store().insert_undirected(src, dst, t)
    }

    fn add_edges<E: Into<TemporalEdge>>(&self, edges: impl IntoIterator<Item = E>) -> BatchStats {
        self.apply_batch(&EdgeBatch::from_edges(EdgeOp::Add, edges))
    }
}

pub trait DeletionOps: BatchOps {
    /// Delete the undirected edge `src <-> dst` at time `t`. Returns `false` if it was absent.
    fn delete_edge(&self, t: Timestamp, src: VertexId, dst: VertexId) -> bool {
        self.core_store().delete_undirected(src, dst, t)
    }

    fn delete_edges<E: Into<TemporalEdge>>(&self, edges: impl IntoIterator<Item = E>) -> BatchStats {
        self.apply_batch(&EdgeBatch::from_edges(EdgeOp::Delete, edges))
    }
}

impl<G: BatchOps + ?Sized> AdditionOps for G {}
impl<G: BatchOps + ?Sized> DeletionOps for G {}

impl BatchOps for tempus_core::entities::graph::tgraph::TemporalEdgeStore {}
