use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use tempus::{db::task, prelude::*};
use tempus_benchmark::common::{bench, make_batch, make_edges};

pub fn ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");
    group.sample_size(10);

    for num_times in [1u64, 16, 1024] {
        let edges = make_edges(100_000, 10_000, num_times, 7);
        let batch = make_batch(EdgeOp::Add, &edges);
        group.throughput(Throughput::Elements(edges.len() as u64));

        bench(&mut group, "group batch", Some(num_times), |b| {
            b.iter(|| black_box(batch.group()))
        });

        let grouped = batch.group();
        bench(&mut group, "parallel apply", Some(num_times), |b| {
            b.iter_batched(
                TemporalEdgeStore::new,
                |store| task::POOL.install(|| grouped.apply(&store, EdgeOp::Add)),
                BatchSize::LargeInput,
            )
        });
        bench(&mut group, "serial apply", Some(num_times), |b| {
            b.iter_batched(
                TemporalEdgeStore::new,
                |store| grouped.apply_serial(&store, EdgeOp::Add),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();

    let mut single = c.benchmark_group("single edge");
    let edges = make_edges(10_000, 1_000, 100, 3);
    single.throughput(Throughput::Elements(edges.len() as u64));
    bench(&mut single, "insert then delete", None, |b| {
        let store = TemporalEdgeStore::new();
        b.iter(|| {
            for (s, d, t) in edges.iter() {
                store.insert_undirected(*s, *d, *t);
            }
            for (s, d, t) in edges.iter() {
                store.delete_undirected(*d, *s, *t);
            }
        })
    });
    single.finish();
}

criterion_group!(benches, ingestion);
criterion_main!(benches);
