use criterion::{measurement::WallTime, Bencher, BenchmarkGroup, BenchmarkId};
use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};
use tempus::prelude::*;
use tempus_api::core::utils::logging::global_info_logger;
use tracing::info;

/// Random edges over `num_vertices` vertices and `num_times` timestamps, reproducible for a seed.
pub fn make_edges(num_edges: usize, num_vertices: u64, num_times: u64, seed: u64) -> Vec<(u64, u64, u64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let vertices = Uniform::new(0, num_vertices);
    let times = Uniform::new(0, num_times);
    (0..num_edges)
        .map(|_| (rng.sample(&vertices), rng.sample(&vertices), rng.sample(&times)))
        .collect()
}

pub fn make_batch(op: EdgeOp, edges: &[(u64, u64, u64)]) -> EdgeBatch {
    EdgeBatch::from_edges(op, edges.iter().copied())
}

pub fn bootstrap_graph(num_edges: usize, num_vertices: u64, num_times: u64) -> TemporalGraph {
    global_info_logger();
    let graph = TemporalGraph::new();
    let stats = graph.add_edges(make_edges(num_edges, num_vertices, num_times, 42));
    info!(
        applied = stats.applied,
        timestamps = graph.num_timestamps(),
        "bootstrapped benchmark graph"
    );
    graph
}

/// Registers `task` in `group`, keyed by the window width or timestamp count it runs over.
pub fn bench<F>(
    group: &mut BenchmarkGroup<WallTime>,
    name: &str,
    timestamps: Option<Timestamp>,
    task: F,
) where
    F: FnMut(&mut Bencher<'_, WallTime>),
{
    match timestamps {
        Some(n) => group.bench_function(BenchmarkId::new(name, n), task),
        None => group.bench_function(name, task),
    };
}
