// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flowmap Index: greedy-radius, multi-zoom point clustering.
//!
//! Flowmap Index is the spatial building block behind flow-map clustering.
//!
//! - Load weighted points given in normalized spherical Mercator coordinates (`x`, `y` in `[0, 1]`).
//! - Cluster them once per zoom level, from the finest level down to the coarsest.
//! - Read back a per-zoom node forest where every node knows its parent cluster one level up.
//!
//! Clustering is greedy: at each zoom the heaviest unvisited node seeds a cluster and absorbs every
//! unvisited neighbor within `radius / (extent * 2^zoom)`. Cluster positions are weight-weighted
//! means of their members. Cluster IDs encode the seed position and the zoom, so they are distinct
//! across all levels of one index.
//!
//! Neighbor search is pluggable via a small [`Backend`] trait. The default backend is a uniform
//! hash [`Grid`] sized to the search radius; [`FlatVec`] does linear scans and is handy for tiny
//! inputs and for cross-checking.
//!
//! # Example
//!
//! ```rust
//! use flowmap_index::{ClusterIndex, ClusterOptions, NodeKind, WeightedPoint};
//!
//! let points = [
//!     WeightedPoint::from_lng_lat(8.54, 47.37, 10.0),
//!     WeightedPoint::from_lng_lat(8.55, 47.38, 5.0),
//!     WeightedPoint::from_lng_lat(-0.12, 51.50, 1.0),
//! ];
//! let index = ClusterIndex::load(ClusterOptions::default(), &points);
//!
//! // The finest level holds every input point as a leaf.
//! let finest = index.level(index.max_zoom() + 1).unwrap();
//! assert_eq!(finest.len(), 3);
//!
//! // At zoom 2 the two points in Zurich share a cluster while London stays alone.
//! let regional = index.level(2).unwrap();
//! assert_eq!(regional.len(), 2);
//! assert!(regional.iter().any(|n| matches!(n.kind, NodeKind::Cluster { num_points: 2, .. })));
//!
//! // At zoom 0 everything has collapsed into one cluster.
//! assert_eq!(index.level(0).unwrap().len(), 1);
//! ```
//!
//! ### Float semantics
//!
//! Inputs are assumed finite. Latitudes are clamped to the Mercator square.
//!
//! This crate is `no_std` and uses `alloc`. Enable `std` (default) or `libm` for float math.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod backends;
pub mod index;
mod math;
pub mod project;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::grid::Grid;
pub use index::{ClusterIndex, ClusterNode, ClusterOptions, MAX_SUPPORTED_ZOOM, NodeKind};
pub use project::{lat_y, lng_x, x_lng, y_lat};
pub use types::{Aabb2D, WeightedPoint};
