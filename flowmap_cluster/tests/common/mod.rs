// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the `flowmap_cluster` integration tests.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; each test file uses a different subset."
)]

use flowmap_cluster::{ClusterTree, FlowAccessors, LocationAccessors, LocationWeights};
use kurbo::Point;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Place {
    pub(crate) id: String,
    pub(crate) lng: f64,
    pub(crate) lat: f64,
}

pub(crate) fn place(id: &str, lng: f64, lat: f64) -> Place {
    Place {
        id: id.to_owned(),
        lng,
        lat,
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Places;

impl LocationAccessors<Place> for Places {
    type Id = String;

    fn location_id(&self, p: &Place) -> String {
        p.id.clone()
    }

    fn location_centroid(&self, p: &Place) -> Point {
        Point::new(p.lng, p.lat)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Trip {
    pub(crate) origin: String,
    pub(crate) dest: String,
    pub(crate) count: f64,
}

pub(crate) fn trip(origin: &str, dest: &str, count: f64) -> Trip {
    Trip {
        origin: origin.to_owned(),
        dest: dest.to_owned(),
        count,
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Trips;

impl FlowAccessors<Trip> for Trips {
    type Id = String;

    fn origin_id(&self, t: &Trip) -> String {
        t.origin.clone()
    }

    fn dest_id(&self, t: &Trip) -> String {
        t.dest.clone()
    }

    fn magnitude(&self, t: &Trip) -> f64 {
        t.count
    }
}

/// Deterministic xorshift generator so fixtures are reproducible.
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut s = self.0;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.0 = s;
        s
    }

    /// Uniform in `[0, 1)`.
    pub(crate) fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    pub(crate) fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// `n` places scattered over central Europe, grouped around a few towns.
pub(crate) fn scattered_places(n: usize, seed: u64) -> Vec<Place> {
    let towns = [(8.54, 47.37), (7.45, 46.95), (6.14, 46.20), (11.58, 48.14), (2.35, 48.86)];
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|i| {
            let (lng, lat) = towns[rng.below(towns.len())];
            let spread = if i % 3 == 0 { 2.0 } else { 0.2 };
            place(
                &format!("p{i}"),
                lng + (rng.unit() - 0.5) * spread,
                lat + (rng.unit() - 0.5) * spread,
            )
        })
        .collect()
}

/// `n` random trips between `places`, self-loops included.
pub(crate) fn random_trips(places: &[Place], n: usize, seed: u64) -> Vec<Trip> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| {
            let o = &places[rng.below(places.len())];
            let d = &places[rng.below(places.len())];
            trip(&o.id, &d.id, (1 + rng.below(50)) as f64)
        })
        .collect()
}

pub(crate) fn build_weighted(places: Vec<Place>, trips: &[Trip]) -> ClusterTree<Place, Places> {
    let weights = LocationWeights::from_flows(trips, &Trips);
    ClusterTree::build(places, Places, |id| weights.weight(id)).expect("fixture locations are valid")
}

/// A heavy place far from two lighter neighbors that cluster below zoom 6.
pub(crate) fn abc() -> (Vec<Place>, Vec<Trip>) {
    (
        vec![place("A", 0.0, 0.0), place("B", 10.0, 0.0), place("C", 10.5, 0.0)],
        vec![trip("A", "B", 7.0), trip("A", "C", 2.0), trip("B", "C", 1.0)],
    )
}

pub(crate) fn abc_weight(id: &str) -> f64 {
    match id {
        "A" => 10.0,
        "B" => 5.0,
        _ => 1.0,
    }
}
