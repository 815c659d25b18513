#![allow(dead_code)]

use proptest::prelude::*;
use std::{collections::BTreeSet, io::Write};
use tempfile::NamedTempFile;
use tempus::prelude::*;

/// Random `(src, dst, time)` records over a small vertex and time domain so that collisions
/// and shared timestamps are common.
pub fn build_edge_list(
    len: usize,
    num_vertices: u64,
    num_times: u64,
) -> impl Strategy<Value = Vec<(u64, u64, u64)>> {
    proptest::collection::vec((0..num_vertices, 0..num_vertices, 0..num_times), 0..=len)
}

/// Edges to add plus a subset of them (or their reverses) to delete afterwards.
pub fn build_add_delete_lists(
    len: usize,
    num_vertices: u64,
    num_times: u64,
) -> impl Strategy<Value = (Vec<(u64, u64, u64)>, Vec<(u64, u64, u64)>)> {
    build_edge_list(len, num_vertices, num_times).prop_flat_map(|adds| {
        let n = adds.len();
        (
            Just(adds),
            proptest::collection::vec((any::<bool>(), any::<bool>()), n),
        )
            .prop_map(|(adds, picks)| {
                let deletes = adds
                    .iter()
                    .zip(picks)
                    .filter(|(_, (keep, _))| *keep)
                    .map(|((s, d, t), (_, flip))| if flip { (*d, *s, *t) } else { (*s, *d, *t) })
                    .collect();
                (adds, deletes)
            })
    })
}

/// Canonical form of an undirected edge
pub fn normalise(src: u64, dst: u64, t: u64) -> (u64, u64, u64) {
    (t, src.min(dst), src.max(dst))
}

/// The undirected edges present after applying `adds` and then `deletes`
pub fn expected_edges(
    adds: &[(u64, u64, u64)],
    deletes: &[(u64, u64, u64)],
) -> BTreeSet<(u64, u64, u64)> {
    let mut model: BTreeSet<_> = adds.iter().map(|(s, d, t)| normalise(*s, *d, *t)).collect();
    for (s, d, t) in deletes {
        model.remove(&normalise(*s, *d, *t));
    }
    model
}

/// The undirected edges currently stored, in canonical form
pub fn stored_edges<G: RangeOps>(graph: &G) -> BTreeSet<(u64, u64, u64)> {
    graph
        .edges_window(0..u64::MAX)
        .into_iter()
        .map(|(t, s, d)| normalise(s, d, t))
        .collect()
}

pub fn write_updates(updates: &[EdgeUpdate]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for update in updates {
        writeln!(file, "{update}").unwrap();
    }
    file.flush().unwrap();
    file
}
