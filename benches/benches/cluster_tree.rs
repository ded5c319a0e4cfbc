// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flowmap_cluster::{ClusterTree, FlowAccessors, LocationAccessors, LocationWeights};
use kurbo::Point;

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

#[derive(Clone)]
struct Station {
    id: u32,
    pos: Point,
}

struct Stations;

impl LocationAccessors<Station> for Stations {
    type Id = u32;

    fn location_id(&self, s: &Station) -> u32 {
        s.id
    }

    fn location_centroid(&self, s: &Station) -> Point {
        s.pos
    }
}

struct Trips;

impl FlowAccessors<(u32, u32, f64)> for Trips {
    type Id = u32;

    fn origin_id(&self, f: &(u32, u32, f64)) -> u32 {
        f.0
    }

    fn dest_id(&self, f: &(u32, u32, f64)) -> u32 {
        f.1
    }

    fn magnitude(&self, f: &(u32, u32, f64)) -> f64 {
        f.2
    }
}

fn gen_network(stations: usize, trips: usize) -> (Vec<Station>, Vec<(u32, u32, f64)>) {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    let hubs: Vec<Point> = (0..stations / 200 + 1)
        .map(|_| Point::new(rng.next_f64() * 60.0 - 10.0, rng.next_f64() * 30.0 + 35.0))
        .collect();
    let locations = (0..stations)
        .map(|i| {
            let hub = hubs[i % hubs.len()];
            Station {
                id: i as u32,
                pos: Point::new(
                    hub.x + (rng.next_f64() - 0.5) * 3.0,
                    hub.y + (rng.next_f64() - 0.5) * 3.0,
                ),
            }
        })
        .collect();
    let flows = (0..trips)
        .map(|_| {
            let o = (rng.next_u64() % stations as u64) as u32;
            let d = (rng.next_u64() % stations as u64) as u32;
            (o, d, (rng.next_u64() % 100 + 1) as f64)
        })
        .collect();
    (locations, flows)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_tree_build");
    for &n in &[1_000usize, 5_000] {
        let (stations, trips) = gen_network(n, n * 4);
        let weights = LocationWeights::from_flows(&trips, &Trips);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("build_n{n}"), |b| {
            b.iter_batched(
                || stations.clone(),
                |stations| {
                    let tree = ClusterTree::build(stations, Stations, |id| weights.weight(id));
                    black_box(tree.map(|t| t.clusters().count()).ok());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_tree_aggregate");
    for &n in &[1_000usize, 5_000] {
        let (stations, trips) = gen_network(n, n * 10);
        let weights = LocationWeights::from_flows(&trips, &Trips);
        let Ok(tree) = ClusterTree::build(stations, Stations, |id| weights.weight(id)) else {
            continue;
        };
        group.throughput(Throughput::Elements(trips.len() as u64));
        group.bench_function(format!("aggregate_flows_n{}", trips.len()), |b| {
            b.iter(|| {
                let clustered = tree.aggregate_flows(&trips, &Trips);
                black_box(clustered.aggregates().len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_aggregate);
criterion_main!(benches);
