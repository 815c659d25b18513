use rustc_hash::{FxHashMap, FxHashSet};
use std::{
    collections::{BTreeSet, VecDeque},
    ops::Range,
    time::Instant,
};
use tempus_api::core::entities::{Timestamp, VertexId};
use tracing::debug;

use crate::db::api::view::RangeOps;

/// Partition of the vertices of a window into connected components.
///
/// Component ids are dense, starting at 0, in the order the components were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectedComponents {
    components: Vec<BTreeSet<VertexId>>,
    labels: FxHashMap<VertexId, usize>,
}

impl ConnectedComponents {
    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeSet<VertexId>)> + '_ {
        self.components.iter().enumerate()
    }

    pub fn get(&self, id: usize) -> Option<&BTreeSet<VertexId>> {
        self.components.get(id)
    }

    pub fn component_of(&self, v: VertexId) -> Option<usize> {
        self.labels.get(&v).copied()
    }

    pub fn same_component(&self, a: VertexId, b: VertexId) -> bool {
        matches!((self.component_of(a), self.component_of(b)), (Some(x), Some(y)) if x == y)
    }

    pub fn into_groups(self) -> Vec<BTreeSet<VertexId>> {
        self.components
    }
}

/// Connected components of the subgraph formed by the edges with a timestamp in `window`.
///
/// The window's adjacency is collected in one pass over its edges, then components are grown
/// breadth first from each unvisited vertex in ascending id order, so the result is
/// deterministic for a given store state.
///
/// # Arguments
///
/// * `graph` - the graph or store to read
/// * `window` - half-open range of timestamps
///
/// # Returns
///
/// A [`ConnectedComponents`] covering every vertex with an edge in the window. An empty window
/// yields no components.
pub fn connected_components<G: RangeOps + ?Sized>(
    graph: &G,
    window: Range<Timestamp>,
) -> ConnectedComponents {
    let now = Instant::now();
    let mut adjacency: FxHashMap<VertexId, FxHashSet<VertexId>> = FxHashMap::default();
    graph.for_each_edge(window.clone(), |_, src, dst| {
        adjacency.entry(src).or_default().insert(dst);
    });

    let mut vertices: Vec<VertexId> = adjacency.keys().copied().collect();
    vertices.sort_unstable();

    let mut result = ConnectedComponents::default();
    let mut worklist = VecDeque::new();
    for start in vertices {
        if result.labels.contains_key(&start) {
            continue;
        }
        let id = result.components.len();
        let mut component = BTreeSet::from([start]);
        result.labels.insert(start, id);
        worklist.push_back(start);

        while let Some(v) = worklist.pop_front() {
            let Some(neighbours) = adjacency.get(&v) else {
                continue;
            };
            for n in neighbours {
                if !result.labels.contains_key(n) {
                    result.labels.insert(*n, id);
                    component.insert(*n);
                    worklist.push_back(*n);
                }
            }
        }
        result.components.push(component);
    }

    debug!(
        start = window.start,
        end = window.end,
        components = result.len(),
        vertices = result.num_vertices(),
        "connected components took {:?}",
        now.elapsed()
    );
    result
}
