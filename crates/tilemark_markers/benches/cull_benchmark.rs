//! Benchmark for the culling scan and the coordinate transforms it relies on.
//!
//! TARGET: 10,000 procedural markers scanned well under one frame (16 ms)
//!
//! Run with: cargo bench --package tilemark_markers --bench cull_benchmark

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilemark_markers::{scan, Marker, MarkerStore};
use tilemark_shared::{
    Dimension, IconCatalog, IconProvider, MapGeometry, ScrollOffset, WorldPoint,
};

fn populated_store(count: usize) -> MarkerStore {
    let icons: Vec<Arc<dyn IconProvider>> = IconCatalog::builtin()
        .iter()
        .map(|icon| Arc::clone(&icon.provider))
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let store = MarkerStore::new();
    for i in 0..count {
        let marker = Marker::new(
            rng.gen_range(-2_000..2_000),
            64,
            rng.gen_range(-2_000..2_000),
            Dimension::OVERWORLD,
            Arc::clone(&icons[i % icons.len()]),
            false,
        );
        store.add(marker);
    }
    store
}

fn benchmark_scan(c: &mut Criterion) {
    let store = populated_store(10_000);
    let snapshot = store.snapshot();
    let geometry = MapGeometry::default();
    let dim = Dimension::OVERWORLD;
    let origin = geometry.half_world_size as f64 * geometry.pixels_per_block_w(0.5, &dim);
    let viewport = geometry.compute_viewport(
        ScrollOffset::new(origin - 400.0, origin - 300.0),
        800.0,
        600.0,
        400.0,
        300.0,
        0.5,
        &dim,
    );

    let mut group = c.benchmark_group("cull");
    group.throughput(Throughput::Elements(snapshot.procedural.len() as u64));
    group.bench_function("scan_10k", |b| {
        b.iter(|| black_box(scan(black_box(&snapshot), black_box(&viewport))));
    });
    group.bench_function("snapshot_10k", |b| {
        b.iter(|| black_box(store.snapshot()));
    });
    group.finish();
}

fn benchmark_transforms(c: &mut Criterion) {
    let geometry = MapGeometry::default();
    let dim = Dimension::NETHER;
    let scroll = ScrollOffset::new(1.0e6, 1.0e6);

    c.bench_function("screen_to_world", |b| {
        b.iter(|| {
            black_box(geometry.screen_to_world(
                black_box(123.0),
                black_box(456.0),
                scroll,
                0.25,
                &dim,
            ))
        });
    });

    c.bench_function("world_to_chunk", |b| {
        b.iter(|| black_box(geometry.world_to_chunk(black_box(WorldPoint::new(-17.5, 33.0)), &dim)));
    });
}

criterion_group!(benches, benchmark_scan, benchmark_transforms);
criterion_main!(benches);
