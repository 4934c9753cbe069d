//! Benchmarks for polyline decoding and geodesic nearest-N selection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use finder_geo::{nearest, polyline, Coordinate};

fn create_route(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Walk north-east out of Bangkok
            let step = i as f64 * 0.0007;
            Coordinate::new(13.7563 + step, 100.5018 + step * 0.5)
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("polyline_decode");

    for size in [10, 100, 1000, 10000].iter() {
        let encoded = polyline::encode(&create_route(*size), polyline::DEFAULT_PRECISION)
            .expect("route within bounds");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| polyline::decode(black_box(&encoded), polyline::DEFAULT_PRECISION))
        });
    }

    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let origin = Coordinate::new(13.7563, 100.5018);
    let mut group = c.benchmark_group("nearest_20");

    for size in [100, 1000, 10000].iter() {
        let points = create_route(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| nearest(black_box(&origin), black_box(&points), 20))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_nearest);
criterion_main!(benches);
