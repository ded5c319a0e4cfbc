// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between longitude/latitude and normalized spherical Mercator.
//!
//! Projected coordinates live in the unit square: `x` grows eastward from the antimeridian and
//! `y` grows southward from the top of the Mercator square.

use core::f64::consts::PI;

use crate::math;

/// Project a longitude in degrees to `x` in `[0, 1]`.
#[inline]
pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Project a latitude in degrees to `y` in `[0, 1]`, clamping the poles.
pub fn lat_y(lat: f64) -> f64 {
    let sin = math::sin(lat * PI / 180.0);
    let y = 0.5 - 0.25 * math::ln((1.0 + sin) / (1.0 - sin)) / PI;
    y.clamp(0.0, 1.0)
}

/// Inverse of [`lng_x`].
#[inline]
pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Inverse of [`lat_y`].
pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * math::atan(math::exp(y2)) / PI - 90.0
}
