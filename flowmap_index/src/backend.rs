// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for neighbor search implementations.

use alloc::boxed::Box;
use core::fmt::Debug;

/// Neighbor search abstraction used by [`ClusterIndex`](crate::ClusterIndex).
///
/// One backend instance is reused for every zoom level: the index calls [`prepare`](Self::prepare)
/// with that level's search radius, inserts the level's nodes by slot, then issues radius queries.
pub trait Backend: Debug {
    /// Drop all slots and get ready for queries of roughly `radius`.
    fn prepare(&mut self, radius: f64);

    /// Insert a slot at a projected position.
    fn insert(&mut self, slot: usize, x: f64, y: f64);

    /// Slots within `r` (inclusive) of the position, in ascending slot order.
    fn query_radius<'a>(&'a self, x: f64, y: f64, r: f64) -> Box<dyn Iterator<Item = usize> + 'a>;
}
