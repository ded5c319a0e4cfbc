// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flowmap_index::{Backend, ClusterOptions, Grid, WeightedPoint};

use rstar::RTree;

fn gen_points(n: usize) -> Vec<WeightedPoint> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let lng = -20.0 + x as f64 * 0.05;
            let lat = 35.0 + y as f64 * 0.05;
            out.push(WeightedPoint::from_lng_lat(lng, lat, 1.0));
        }
    }
    out
}

fn bench_radius_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_radius_compare");
    let radius = ClusterOptions::default().radius_at(8);
    for &n in &[64usize, 128] {
        let points = gen_points(n);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("grid_build_query_n{n}"), |b| {
            b.iter_batched(
                Grid::default,
                |mut grid| {
                    grid.prepare(radius);
                    for (slot, p) in points.iter().enumerate() {
                        grid.insert(slot, p.x, p.y);
                    }
                    let hits: usize = points
                        .iter()
                        .step_by(17)
                        .map(|p| grid.query_radius(p.x, p.y, radius).count())
                        .sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
                |coords| {
                    let tree = RTree::bulk_load(coords);
                    let hits: usize = points
                        .iter()
                        .step_by(17)
                        .map(|p| tree.locate_within_distance([p.x, p.y], radius * radius).count())
                        .sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_radius_compare);
criterion_main!(benches);
