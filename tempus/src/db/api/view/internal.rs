use rayon::ThreadPool;
use std::sync::Arc;
use tempus_core::entities::graph::tgraph::TemporalEdgeStore;

use crate::db::task::POOL;

/// Access to the storage and worker pool behind a graph.
pub trait CoreGraphOps {
    fn core_store(&self) -> &TemporalEdgeStore;

    /// Pool used for batch ingestion and the parallel traversals
    fn thread_pool(&self) -> &ThreadPool {
        &POOL
    }
}

impl CoreGraphOps for TemporalEdgeStore {
    #[inline]
    fn core_store(&self) -> &TemporalEdgeStore {
        self
    }
}

impl<G: CoreGraphOps + ?Sized> CoreGraphOps for Arc<G> {
    #[inline]
    fn core_store(&self) -> &TemporalEdgeStore {
        (**self).core_store()
    }

    #[inline]
    fn thread_pool(&self) -> &ThreadPool {
        (**self).thread_pool()
    }
}
