//! Benchmarks for evaluation, discretization and full frame rebuilds.

use std::hint::black_box;

use bezcurve::{
    AnchorStore, CurveMode, Editor, EditorConfig, Event, Point2, bezier, compose, evaluate,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// A zig-zag store with `n` anchors.
fn zigzag(n: usize) -> AnchorStore {
    let mut store = AnchorStore::new();
    for i in 0..n {
        let y = if i % 2 == 0 { 0.0 } else { 80.0 };
        store.insert_anchor(Point2::new(i as f64 * 50.0, y));
    }
    store
}

/// Benchmark single-point evaluation across segment degrees.
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for len in [3usize, 4, 8, 16] {
        let segment: Vec<Point2> = (0..len)
            .map(|i| Point2::new(i as f64, (i * i) as f64))
            .collect();
        group.bench_function(BenchmarkId::new("degree", len - 1), |b| {
            b.iter(|| evaluate(black_box(&segment), black_box(0.37)))
        });
    }

    group.finish();
}

/// Benchmark polyline discretization at several sample counts.
fn bench_discretize(c: &mut Criterion) {
    let mut group = c.benchmark_group("discretize");
    let segment = [
        Point2::new(0.0, 0.0),
        Point2::new(20.0, 0.0),
        Point2::new(80.0, 40.0),
        Point2::new(100.0, 0.0),
    ];

    for samples in [10usize, 100, 1000] {
        group.bench_function(BenchmarkId::new("cubic", samples), |b| {
            b.iter(|| bezier::polyline(black_box(&segment), samples))
        });
    }

    group.finish();
}

/// Benchmark composing segments for each mode.
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    let store = zigzag(64);

    for mode in [CurveMode::Composite, CurveMode::Segmented, CurveMode::Single] {
        group.bench_function(BenchmarkId::new("mode", mode), |b| {
            b.iter(|| compose(black_box(store.anchors()), mode))
        });
    }

    group.finish();
}

/// Benchmark the per-mutation cost: one drag step plus a full frame rebuild.
fn bench_drag_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_frame");

    for anchors in [4usize, 16, 64] {
        let mut editor = Editor::with_config(EditorConfig::default());
        for i in 0..anchors {
            editor
                .apply(Event::InteractionStart(Point2::new(i as f64 * 50.0, 0.0)))
                .expect("insert");
            editor.apply(Event::InteractionEnd).expect("release");
        }
        editor
            .apply(Event::InteractionStart(Point2::new(0.0, 0.0)))
            .expect("grab");

        group.bench_function(BenchmarkId::new("anchors", anchors), |b| {
            let mut y = 0.0;
            b.iter(|| {
                y += 0.5;
                editor
                    .apply(Event::InteractionMove(Point2::new(0.0, y)))
                    .expect("move");
                editor.frame()
            })
        });
    }

    group.finish();
}

#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod bench_defs {
    use super::*;
    criterion_group!(
        benches,
        bench_evaluate,
        bench_discretize,
        bench_compose,
        bench_drag_frame
    );
}

pub use bench_defs::benches;
criterion_main!(benches);
