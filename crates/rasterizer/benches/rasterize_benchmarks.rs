//! Benchmarks for tile rasterization.
//!
//! Run with: cargo bench --package rasterizer --bench rasterize_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo_common::Segment;
use rasterizer::{DrawFunction, Shape, TilePos, TileRasterizer, VectorElement};
use spatial_index::Bvh;
use test_utils::{random_segments, seeded_rng};

const EXTENT: f64 = 2_048.0;

fn line_rasterizer(count: usize, radius: f64) -> TileRasterizer {
    let mut rng = seeded_rng(42);
    let elements = random_segments(&mut rng, count, EXTENT, 64.0)
        .chunks(8)
        .enumerate()
        .filter_map(|(i, chunk)| {
            let shape = Shape::WideLine {
                segments: Bvh::build(chunk.to_vec()),
                radius,
            };
            VectorElement::new(format!("road-{}", i), 0, shape, DrawFunction::add_weight(), 1).ok()
        })
        .collect();
    TileRasterizer::new(elements)
}

fn polygon_rasterizer(count: usize) -> TileRasterizer {
    let step = EXTENT / count as f64;
    let elements = (0..count)
        .filter_map(|i| {
            let min = i as f64 * step;
            let max = min + step * 1.5;
            let edges = Bvh::build(vec![
                Segment::new(min, min, min, max),
                Segment::new(min, max, max, max),
                Segment::new(max, max, max, min),
                Segment::new(max, min, min, min),
            ]);
            let draw = DrawFunction::fill(i as i32);
            VectorElement::new(format!("lot-{}", i), 0, Shape::FillPolygon { edges }, draw, 0).ok()
        })
        .collect();
    TileRasterizer::new(elements)
}

fn tiles() -> Vec<TilePos> {
    let n = (EXTENT / 16.0) as i32;
    (0..n).flat_map(|x| (0..n).map(move |z| TilePos::new(x, z))).collect()
}

fn bench_wide_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_lines");
    let tiles = tiles();

    for count in [1_000, 10_000] {
        let rasterizer = line_rasterizer(count, 2.0);
        group.throughput(Throughput::Elements(tiles.len() as u64));
        group.bench_with_input(BenchmarkId::new("rasterize_all", count), &tiles, |b, tiles| {
            b.iter(|| rasterizer.rasterize_all(black_box(tiles)));
        });
    }

    group.finish();
}

fn bench_polygon_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_fill");
    let rasterizer = polygon_rasterizer(256);

    group.bench_function("single_tile", |b| {
        b.iter(|| rasterizer.rasterize(black_box(TilePos::new(32, 32))));
    });

    group.finish();
}

criterion_group!(benches, bench_wide_lines, bench_polygon_fill);
criterion_main!(benches);
