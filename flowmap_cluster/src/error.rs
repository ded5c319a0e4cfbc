// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while building a [`ClusterTree`](crate::ClusterTree).

use core::fmt;

/// Invalid input rejected by [`ClusterTree::build`](crate::ClusterTree::build).
///
/// Construction fails fast on the first offending input; no partial tree is returned.
#[derive(Clone, PartialEq)]
pub enum BuildError<I> {
    /// Two locations share an ID.
    DuplicateLocationId {
        /// The shared ID.
        id: I,
        /// Index of the first location with this ID.
        first: usize,
        /// Index of the second location with this ID.
        second: usize,
    },
    /// The weight function returned a negative or non-finite weight, or a weight that made the
    /// summed weight of all locations overflow.
    InvalidWeight {
        /// The location's ID.
        id: I,
        /// The rejected weight.
        weight: f64,
    },
    /// The location's centroid has a non-finite coordinate.
    InvalidCentroid {
        /// The location's ID.
        id: I,
    },
    /// The clustering options have a negative or non-finite radius, or a non-positive or
    /// non-finite extent.
    InvalidOptions {
        /// The rejected radius.
        radius: f64,
        /// The rejected extent.
        extent: f64,
    },
}

impl<I> BuildError<I> {
    /// The ID of the location that caused the error, if a location did.
    pub fn location_id(&self) -> Option<&I> {
        match self {
            Self::DuplicateLocationId { id, .. }
            | Self::InvalidWeight { id, .. }
            | Self::InvalidCentroid { id } => Some(id),
            Self::InvalidOptions { .. } => None,
        }
    }
}

impl<I: fmt::Debug> fmt::Debug for BuildError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLocationId { id, first, second } => write!(
                f,
                "DuplicateLocationId {{ id: {id:?}, first: {first}, second: {second} }}"
            ),
            Self::InvalidWeight { id, weight } => {
                write!(f, "InvalidWeight {{ id: {id:?}, weight: {weight} }}")
            }
            Self::InvalidCentroid { id } => write!(f, "InvalidCentroid {{ id: {id:?} }}"),
            Self::InvalidOptions { radius, extent } => {
                write!(f, "InvalidOptions {{ radius: {radius}, extent: {extent} }}")
            }
        }
    }
}

impl<I: fmt::Debug> fmt::Display for BuildError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLocationId { id, first, second } => write!(
                f,
                "location id {id:?} is used by locations {first} and {second}"
            ),
            Self::InvalidWeight { id, weight } => write!(
                f,
                "location {id:?} has weight {weight}; weights must be finite and non-negative"
            ),
            Self::InvalidCentroid { id } => {
                write!(f, "location {id:?} has a non-finite centroid")
            }
            Self::InvalidOptions { radius, extent } => write!(
                f,
                "cluster radius {radius} and extent {extent} are unusable; \
                 the radius must be finite and non-negative, the extent finite and positive"
            ),
        }
    }
}

impl<I: fmt::Debug> core::error::Error for BuildError<I> {}
