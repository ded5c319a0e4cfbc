// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float functions for both `std` and `libm` builds.

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("flowmap_index requires either the `std` or the `libm` feature");

#[cfg(feature = "std")]
mod imp {
    #[inline]
    pub(crate) fn sin(v: f64) -> f64 {
        f64::sin(v)
    }

    #[inline]
    pub(crate) fn ln(v: f64) -> f64 {
        f64::ln(v)
    }

    #[inline]
    pub(crate) fn atan(v: f64) -> f64 {
        f64::atan(v)
    }

    #[inline]
    pub(crate) fn exp(v: f64) -> f64 {
        f64::exp(v)
    }

    #[inline]
    pub(crate) fn exp2(v: f64) -> f64 {
        f64::exp2(v)
    }

    #[inline]
    pub(crate) fn ceil(v: f64) -> f64 {
        f64::ceil(v)
    }
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
mod imp {
    #[inline]
    pub(crate) fn sin(v: f64) -> f64 {
        libm::sin(v)
    }

    #[inline]
    pub(crate) fn ln(v: f64) -> f64 {
        libm::log(v)
    }

    #[inline]
    pub(crate) fn atan(v: f64) -> f64 {
        libm::atan(v)
    }

    #[inline]
    pub(crate) fn exp(v: f64) -> f64 {
        libm::exp(v)
    }

    #[inline]
    pub(crate) fn exp2(v: f64) -> f64 {
        libm::exp2(v)
    }

    #[inline]
    pub(crate) fn ceil(v: f64) -> f64 {
        libm::ceil(v)
    }
}

#[cfg(any(feature = "std", feature = "libm"))]
pub(crate) use imp::{atan, ceil, exp, exp2, ln, sin};
