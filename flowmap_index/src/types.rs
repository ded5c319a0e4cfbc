// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;

use crate::project::{lat_y, lng_x};

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }
}

impl Aabb2D<f64> {
    /// The square envelope of a circle, used to bound radius queries.
    pub const fn around(x: f64, y: f64, r: f64) -> Self {
        Self {
            min_x: x - r,
            min_y: y - r,
            max_x: x + r,
            max_y: y + r,
        }
    }
}

/// A point to cluster, in normalized spherical Mercator coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeightedPoint {
    /// Projected x in `[0, 1]`.
    pub x: f64,
    /// Projected y in `[0, 1]`.
    pub y: f64,
    /// Non-negative weight; heavier points seed clusters first and pull centroids.
    pub weight: f64,
}

impl WeightedPoint {
    /// Create a point from projected coordinates.
    pub const fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }

    /// Create a point by projecting a longitude/latitude pair in degrees.
    pub fn from_lng_lat(lng: f64, lat: f64, weight: f64) -> Self {
        Self {
            x: lng_x(lng),
            y: lat_y(lat),
            weight,
        }
    }
}

/// Squared euclidean distance between two projected positions.
#[inline]
pub(crate) fn dist_sq(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
