// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Location weights derived from flow totals.

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::types::FlowAccessors;

/// Incoming and outgoing flow totals per location.
///
/// A location weighs the larger of its two totals, so a hub that only sends is as heavy as one
/// that only receives. Pass [`weight`](Self::weight) to [`ClusterTree::build`](crate::ClusterTree::build):
///
/// ```
/// use flowmap_cluster::{FlowAccessors, LocationWeights};
///
/// struct Trips;
///
/// impl FlowAccessors<(u32, u32, f64)> for Trips {
///     type Id = u32;
///     fn origin_id(&self, f: &(u32, u32, f64)) -> u32 { f.0 }
///     fn dest_id(&self, f: &(u32, u32, f64)) -> u32 { f.1 }
///     fn magnitude(&self, f: &(u32, u32, f64)) -> f64 { f.2 }
/// }
///
/// let trips: [(u32, u32, f64); 3] = [(1, 2, 4.0), (1, 3, 1.0), (3, 2, 2.0)];
/// let weights = LocationWeights::from_flows(&trips, &Trips);
/// assert_eq!(weights.outgoing(&1), 5.0);
/// assert_eq!(weights.incoming(&2), 6.0);
/// assert_eq!(weights.weight(&3), 2.0);
/// assert_eq!(weights.weight(&9), 0.0);
/// ```
#[derive(Clone)]
pub struct LocationWeights<I> {
    incoming: HashMap<I, f64>,
    outgoing: HashMap<I, f64>,
}

impl<I> fmt::Debug for LocationWeights<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationWeights")
            .field("destinations", &self.incoming.len())
            .field("origins", &self.outgoing.len())
            .finish()
    }
}

impl<I: Clone + Eq + Hash> LocationWeights<I> {
    /// Total the magnitudes of `flows` per destination and per origin.
    pub fn from_flows<F, FA>(flows: &[F], accessors: &FA) -> Self
    where
        FA: FlowAccessors<F, Id = I>,
    {
        let mut incoming = HashMap::new();
        let mut outgoing = HashMap::new();
        for flow in flows {
            let magnitude = accessors.magnitude(flow);
            *incoming.entry(accessors.dest_id(flow)).or_insert(0.0) += magnitude;
            *outgoing.entry(accessors.origin_id(flow)).or_insert(0.0) += magnitude;
        }
        Self { incoming, outgoing }
    }

    /// Sum of magnitudes of flows ending at `id`.
    pub fn incoming(&self, id: &I) -> f64 {
        self.incoming.get(id).copied().unwrap_or(0.0)
    }

    /// Sum of magnitudes of flows starting at `id`.
    pub fn outgoing(&self, id: &I) -> f64 {
        self.outgoing.get(id).copied().unwrap_or(0.0)
    }

    /// `max(incoming, outgoing)`; `0.0` for locations without flows.
    pub fn weight(&self, id: &I) -> f64 {
        self.incoming(id).max(self.outgoing(id))
    }
}
