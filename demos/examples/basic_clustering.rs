// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cluster tree basics.
//!
//! Build a tree over a few Swiss cities, then print what each zoom level shows.
//!
//! Run:
//! - `cargo run -p flowmap_demos --example basic_clustering`

use flowmap_cluster::{ClusterTree, Item, LocationAccessors};
use kurbo::Point;

struct City {
    name: &'static str,
    lng: f64,
    lat: f64,
    population: f64,
}

struct Cities;

impl LocationAccessors<City> for Cities {
    type Id = &'static str;

    fn location_id(&self, c: &City) -> &'static str {
        c.name
    }

    fn location_centroid(&self, c: &City) -> Point {
        Point::new(c.lng, c.lat)
    }
}

fn city(name: &'static str, lng: f64, lat: f64, population: f64) -> City {
    City {
        name,
        lng,
        lat,
        population,
    }
}

fn main() {
    let cities = vec![
        city("Zurich", 8.54, 47.37, 421.0),
        city("Winterthur", 8.72, 47.50, 114.0),
        city("Basel", 7.59, 47.56, 173.0),
        city("Bern", 7.45, 46.95, 134.0),
        city("Lausanne", 6.63, 46.52, 140.0),
        city("Geneva", 6.14, 46.20, 203.0),
        city("Lugano", 8.95, 46.00, 63.0),
    ];
    let population: Vec<(&str, f64)> = cities.iter().map(|c| (c.name, c.population)).collect();
    let weight = |id: &&str| {
        population
            .iter()
            .find(|(name, _)| name == id)
            .map_or(0.0, |(_, p)| *p)
    };

    let tree = match ClusterTree::build(cities, Cities, weight) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("cannot build tree: {e}");
            return;
        }
    };
    println!("{tree:?}");

    for zoom in tree.zoom_range() {
        println!("zoom {zoom}:");
        let Some(items) = tree.items_at(Some(zoom)) else {
            continue;
        };
        for item in items {
            match item {
                Item::Location(city) => println!("  {}", city.name),
                Item::Cluster(cluster) => {
                    let members: Vec<_> = tree.leaves_of(item).iter().map(|c| c.name).collect();
                    println!(
                        "  {} at ({:.2}, {:.2}): {}",
                        cluster.name,
                        cluster.centroid.x,
                        cluster.centroid.y,
                        members.join(", ")
                    );
                }
            }
        }
    }

    for name in ["Zurich", "Lugano"] {
        if let Some(zoom) = tree.min_zoom_for(&name) {
            println!("{name} is shown on its own from zoom {zoom}");
        }
    }
}
