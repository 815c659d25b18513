//! # tempus
//!
//! An in-memory temporal graph of undirected edges stamped with a time, built for concurrent
//! ingestion and windowed queries.
//!
//! Edges live in a [`TemporalEdgeStore`](tempus_core::entities::graph::tgraph::TemporalEdgeStore),
//! a two level concurrent map `time -> source -> destinations` in which every undirected edge is
//! stored in both directions. On top of it this crate provides
//!
//! * batched ingestion, grouped by timestamp and applied with one rayon task per timestamp,
//! * windowed traversal over half-open ranges of timestamps,
//! * connected components of a window,
//! * readers for `add`/`delete` update streams and tools to prepare them.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use tempus::prelude::*;
//!
//! let updates = "add 1 2 2010\nadd 2 3 2010\nadd 1 3 2012\ndelete 1 2 2010\n";
//! let graph = TemporalGraph::load_from_reader(Cursor::new(updates));
//!
//! assert!(!graph.has_edge(1, 2, 2010));
//! assert_eq!(graph.vertices(2010..2013).len(), 3);
//!
//! let components = graph.connected_components(2010..2013);
//! assert_eq!(components.len(), 1);
//! ```
//!
//! ## Consistency
//!
//! Each single-edge mutation is atomic for its timestamp. Reads spanning a window are not
//! isolated from concurrent writers and may observe a batch partially applied.

pub mod algorithms;
pub mod config;
pub mod db;
pub mod errors;
pub mod io;

pub mod prelude {
    pub use crate::{
        algorithms::components::{connected_components, ConnectedComponents},
        db::{
            api::{
                mutation::{
                    batch::{BatchStats, EdgeBatch, GroupedBatch},
                    AdditionOps, BatchOps, DeletionOps,
                },
                view::RangeOps,
            },
            graph::graph::TemporalGraph,
        },
        errors::GraphError,
    };
    pub use tempus_api::core::{
        entities::{TemporalEdge, Timestamp, VertexId},
        input::EdgeUpdate,
        EdgeOp,
    };
    pub use tempus_core::entities::graph::tgraph::TemporalEdgeStore;
}
