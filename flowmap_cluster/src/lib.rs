// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flowmap Cluster: hierarchical location clustering and per-zoom flow aggregation.
//!
//! Flow maps get unreadable when thousands of locations and flows are drawn at once. This crate
//! groups nearby locations into clusters, one clustering per zoom level, and re-aggregates the
//! flows between them so each zoom shows a readable amount of detail.
//!
//! - [`ClusterTree`]: an immutable hierarchy of locations and [`LocationCluster`]s per zoom level,
//!   with lookups for the clusters that absorb a location and for when it stands alone.
//! - [`ClusterTree::aggregate_flows`]: remaps flow endpoints onto each zoom's items and sums flows
//!   that share an origin and destination, reusing aggregates across zoom levels.
//! - [`LocationWeights`]: derives location weights from flow totals; heavier locations seed
//!   clusters and pull centroids toward themselves.
//!
//! Locations and flows are caller types. [`LocationAccessors`] and [`FlowAccessors`] read IDs,
//! centroids and magnitudes out of them. Spatial clustering itself lives in [`flowmap_index`].
//!
//! ## Zoom range
//!
//! A tree only materializes the zoom levels where the hierarchy changes. At
//! [`max_zoom`](ClusterTree::max_zoom) every location is its own item; at
//! [`min_zoom`](ClusterTree::min_zoom) the clustering is as coarse as it gets. Queries outside
//! that range return `None`.
//!
//! # Example
//!
//! ```rust
//! use flowmap_cluster::{ClusterTree, FlowAccessors, ItemId, LocationAccessors, ZoomFlows};
//! use kurbo::Point;
//!
//! type Place = (&'static str, f64, f64);
//! type Trip = (&'static str, &'static str, f64);
//!
//! struct Places;
//!
//! impl LocationAccessors<Place> for Places {
//!     type Id = &'static str;
//!     fn location_id(&self, p: &Place) -> &'static str { p.0 }
//!     fn location_centroid(&self, p: &Place) -> Point { Point::new(p.1, p.2) }
//! }
//!
//! struct Trips;
//!
//! impl FlowAccessors<Trip> for Trips {
//!     type Id = &'static str;
//!     fn origin_id(&self, t: &Trip) -> &'static str { t.0 }
//!     fn dest_id(&self, t: &Trip) -> &'static str { t.1 }
//!     fn magnitude(&self, t: &Trip) -> f64 { t.2 }
//! }
//!
//! let places = vec![("A", 0.0, 0.0), ("B", 10.0, 0.0), ("C", 10.5, 0.0)];
//! let trips = [("A", "B", 7.0), ("A", "C", 2.0), ("B", "C", 1.0)];
//!
//! let tree = ClusterTree::build(places, Places, |id| match *id {
//!     "A" => 10.0,
//!     "B" => 5.0,
//!     _ => 1.0,
//! })
//! .unwrap();
//! assert_eq!(tree.zoom_range(), 1..=6);
//!
//! // B and C share a cluster at zoom 5 while A is still on its own.
//! let k = tree.cluster_for(&"B", 5).unwrap();
//! assert_eq!(tree.cluster_for(&"C", 5).map(|c| c.id), Some(k.id));
//! assert!(tree.cluster_for(&"A", 5).is_none());
//!
//! let flows = tree.aggregate_flows(&trips, &Trips);
//!
//! // The finest zoom shows the raw flows.
//! assert!(matches!(flows.flows_at(6), Some(ZoomFlows::Raw(raw)) if raw.len() == 3));
//!
//! // At zoom 5, A->B and A->C merge, and B->C becomes a self-loop of the cluster.
//! let Some(ZoomFlows::Aggregated(at5)) = flows.flows_at(5) else {
//!     unreachable!()
//! };
//! let at5: Vec<_> = at5.map(|f| (f.origin.clone(), f.dest.clone(), f.magnitude)).collect();
//! let k = ItemId::Cluster(k.id);
//! assert_eq!(
//!     at5,
//!     [
//!         (ItemId::Location("A"), k.clone(), 9.0),
//!         (k.clone(), k, 1.0),
//!     ]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable `std` (default) or `libm` for float math, and
//! `tracing` for debug events while building and aggregating.

#![no_std]

extern crate alloc;

mod aggregate;
mod error;
mod tree;
mod types;
mod weights;

pub use aggregate::{AggregateFlow, AggregatedFlows, ClusteredFlows, ZoomFlows};
pub use error::BuildError;
pub use tree::{ClusterTree, Items, default_options};
pub use types::{
    CLUSTER_ID_PREFIX, ClusterId, FlowAccessors, Item, ItemId, LocationAccessors,
    LocationCluster, is_cluster_id,
};
pub use weights::LocationWeights;

pub use flowmap_index;

/// Finest zoom level [`ClusterTree::build`] clusters at.
pub const MAX_CLUSTER_ZOOM: u8 = 18;

/// Cluster radius in tile pixels used by [`ClusterTree::build`].
pub const CLUSTER_RADIUS: f64 = 40.0;
