// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use flowmap_index::{Backend, ClusterIndex, ClusterOptions, FlatVec, Grid, WeightedPoint};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Points spread uniformly over most of the world.
fn gen_uniform_points(count: usize) -> Vec<WeightedPoint> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let lng = rng.next_f64() * 340.0 - 170.0;
            let lat = rng.next_f64() * 140.0 - 70.0;
            WeightedPoint::from_lng_lat(lng, lat, (rng.next_u64() % 100) as f64)
        })
        .collect()
}

/// Points packed around a handful of cities, the typical shape of flow data.
fn gen_city_points(n_cities: usize, per_city: usize, spread: f64) -> Vec<WeightedPoint> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_cities * per_city);
    for _ in 0..n_cities {
        let (clng, clat) = (rng.next_f64() * 300.0 - 150.0, rng.next_f64() * 120.0 - 60.0);
        for _ in 0..per_city {
            let lng = clng + (rng.next_f64() - 0.5) * spread;
            let lat = clat + (rng.next_f64() - 0.5) * spread;
            out.push(WeightedPoint::from_lng_lat(lng, lat, (rng.next_u64() % 20) as f64));
        }
    }
    out
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_load");
    let options = ClusterOptions {
        max_zoom: 18,
        ..ClusterOptions::default()
    };
    for &count in &[1_000usize, 10_000] {
        let uniform = gen_uniform_points(count);
        let cities = gen_city_points(count / 100, 100, 1.0);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_function(format!("grid_uniform_n{count}"), |b| {
            b.iter(|| black_box(ClusterIndex::load_with_backend::<Grid>(options, &uniform)));
        });
        group.bench_function(format!("grid_cities_n{count}"), |b| {
            b.iter(|| black_box(ClusterIndex::load_with_backend::<Grid>(options, &cities)));
        });
        if count <= 1_000 {
            group.bench_function(format!("flatvec_uniform_n{count}"), |b| {
                b.iter(|| black_box(ClusterIndex::load_with_backend::<FlatVec>(options, &uniform)));
            });
            group.bench_function(format!("flatvec_cities_n{count}"), |b| {
                b.iter(|| black_box(ClusterIndex::load_with_backend::<FlatVec>(options, &cities)));
            });
        }
    }
    group.finish();
}

fn bench_radius_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_query");
    let points = gen_city_points(50, 200, 2.0);
    let radius = ClusterOptions::default().radius_at(6);
    group.throughput(Throughput::Elements(points.len() as u64));

    let mut grid = Grid::default();
    let mut flat = FlatVec::default();
    for backend in [&mut grid as &mut dyn Backend, &mut flat] {
        backend.prepare(radius);
        for (slot, p) in points.iter().enumerate() {
            backend.insert(slot, p.x, p.y);
        }
    }

    group.bench_function("grid_query_all", |b| {
        b.iter(|| {
            let hits: usize = points.iter().map(|p| grid.query_radius(p.x, p.y, radius).count()).sum();
            black_box(hits);
        });
    });
    group.bench_function("flatvec_query_all", |b| {
        b.iter(|| {
            let hits: usize = points.iter().map(|p| flat.query_radius(p.x, p.y, radius).count()).sum();
            black_box(hits);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_load, bench_radius_query);
criterion_main!(benches);
