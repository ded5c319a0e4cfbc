// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flow aggregation.
//!
//! Derive location weights from commuter flows, build a tree, and print the flows per zoom.
//!
//! Run:
//! - `cargo run -p flowmap_demos --example aggregate_flows`

use flowmap_cluster::{ClusterTree, FlowAccessors, LocationAccessors, LocationWeights, ZoomFlows};
use kurbo::Point;

struct Commute {
    from: &'static str,
    to: &'static str,
    people: f64,
}

struct Commutes;

impl FlowAccessors<Commute> for Commutes {
    type Id = &'static str;

    fn origin_id(&self, c: &Commute) -> &'static str {
        c.from
    }

    fn dest_id(&self, c: &Commute) -> &'static str {
        c.to
    }

    fn magnitude(&self, c: &Commute) -> f64 {
        c.people
    }
}

struct Towns;

impl LocationAccessors<(&'static str, Point)> for Towns {
    type Id = &'static str;

    fn location_id(&self, t: &(&'static str, Point)) -> &'static str {
        t.0
    }

    fn location_centroid(&self, t: &(&'static str, Point)) -> Point {
        t.1
    }
}

fn commute(from: &'static str, to: &'static str, people: f64) -> Commute {
    Commute { from, to, people }
}

fn main() {
    let towns = vec![
        ("Zurich", Point::new(8.54, 47.37)),
        ("Winterthur", Point::new(8.72, 47.50)),
        ("Uster", Point::new(8.72, 47.35)),
        ("Bern", Point::new(7.45, 46.95)),
        ("Thun", Point::new(7.63, 46.76)),
        ("Geneva", Point::new(6.14, 46.20)),
    ];
    let commutes = [
        commute("Winterthur", "Zurich", 30_000.0),
        commute("Uster", "Zurich", 18_000.0),
        commute("Zurich", "Winterthur", 9_000.0),
        commute("Thun", "Bern", 12_000.0),
        commute("Bern", "Zurich", 4_000.0),
        commute("Geneva", "Bern", 2_500.0),
        commute("Zurich", "Geneva", 1_500.0),
    ];

    let weights = LocationWeights::from_flows(&commutes, &Commutes);
    let tree = match ClusterTree::build(towns, Towns, |id| weights.weight(id)) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("cannot build tree: {e}");
            return;
        }
    };
    let clustered = tree.aggregate_flows(&commutes, &Commutes);
    println!("{clustered:?}");

    for zoom in clustered.zoom_range().rev() {
        let Some(flows) = clustered.flows_at(zoom) else {
            continue;
        };
        println!("zoom {zoom}: {} flows", flows.len());
        match flows {
            ZoomFlows::Raw(raw) => {
                for c in raw {
                    println!("  {} -> {}: {}", c.from, c.to, c.people);
                }
            }
            ZoomFlows::Aggregated(aggregates) => {
                for f in aggregates {
                    let marker = if f.is_self_loop() { " (within cluster)" } else { "" };
                    println!("  {} -> {}: {}{marker}", f.origin, f.dest, f.magnitude);
                }
            }
        }
    }
}
