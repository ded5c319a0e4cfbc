// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-zoom re-aggregation of flows onto the clusters of a [`ClusterTree`].

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;
use core::slice;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::tree::ClusterTree;
use crate::types::{FlowAccessors, ItemId, LocationAccessors};

/// A flow between two items of one zoom level, summing every raw flow that maps onto it.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateFlow<I> {
    /// Origin location or cluster.
    pub origin: ItemId<I>,
    /// Destination location or cluster.
    pub dest: ItemId<I>,
    /// Sum of the magnitudes of the aggregated raw flows.
    pub magnitude: f64,
}

impl<I: PartialEq> AggregateFlow<I> {
    /// Whether origin and destination are the same item.
    pub fn is_self_loop(&self) -> bool {
        self.origin == self.dest
    }
}

/// Flows of every zoom level of a [`ClusterTree`], as produced by
/// [`ClusterTree::aggregate_flows`].
///
/// Aggregates are stored once; a zoom that reuses an aggregate from a finer zoom hands out the
/// same reference.
pub struct ClusteredFlows<'f, F, I> {
    min_zoom: u8,
    max_zoom: u8,
    raw: &'f [F],
    aggregates: Vec<AggregateFlow<I>>,
    /// Aggregate slots per zoom, `by_zoom[zoom - min_zoom]`; unused at `max_zoom`.
    by_zoom: Vec<Vec<usize>>,
}

impl<F, I> fmt::Debug for ClusteredFlows<'_, F, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusteredFlows")
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("raw", &self.raw.len())
            .field("aggregates", &self.aggregates.len())
            .finish_non_exhaustive()
    }
}

impl<'f, F, I> ClusteredFlows<'f, F, I> {
    /// Zoom levels with a flow list, matching the tree's range.
    pub fn zoom_range(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }

    /// The raw flows, which are also the flows at `max_zoom`.
    pub fn raw(&self) -> &'f [F] {
        self.raw
    }

    /// Every distinct aggregate across all zoom levels below `max_zoom`.
    pub fn aggregates(&self) -> &[AggregateFlow<I>] {
        &self.aggregates
    }

    /// The flows at `zoom`, or `None` outside [`zoom_range`](Self::zoom_range).
    pub fn flows_at(&self, zoom: u8) -> Option<ZoomFlows<'_, F, I>> {
        if !self.zoom_range().contains(&zoom) {
            return None;
        }
        if zoom == self.max_zoom {
            return Some(ZoomFlows::Raw(self.raw));
        }
        let slots = &self.by_zoom[usize::from(zoom - self.min_zoom)];
        Some(ZoomFlows::Aggregated(AggregatedFlows {
            aggregates: &self.aggregates,
            slots: slots.iter(),
        }))
    }
}

/// The flows of one zoom level.
#[derive(Debug)]
pub enum ZoomFlows<'a, F, I> {
    /// Raw flows, unchanged; used at the finest zoom.
    Raw(&'a [F]),
    /// Aggregated flows in first-encounter order.
    Aggregated(AggregatedFlows<'a, I>),
}

impl<F, I> ZoomFlows<'_, F, I> {
    /// Number of flows at this zoom.
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(raw) => raw.len(),
            Self::Aggregated(it) => it.len(),
        }
    }

    /// Whether there are no flows at this zoom.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the flows are aggregates rather than raw flows.
    pub fn is_aggregated(&self) -> bool {
        matches!(self, Self::Aggregated(_))
    }
}

/// Iterator over the aggregates of one zoom level.
#[derive(Clone, Debug)]
pub struct AggregatedFlows<'a, I> {
    aggregates: &'a [AggregateFlow<I>],
    slots: slice::Iter<'a, usize>,
}

impl<'a, I> Iterator for AggregatedFlows<'a, I> {
    type Item = &'a AggregateFlow<I>;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().map(|&slot| &self.aggregates[slot])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<I> ExactSizeIterator for AggregatedFlows<'_, I> {}

impl<L, A: LocationAccessors<L>> ClusterTree<L, A> {
    /// Re-aggregate `flows` onto this tree's items at every zoom level.
    ///
    /// At `max_zoom` the raw flows are returned unchanged. Below it, each flow's endpoints resolve
    /// to their enclosing cluster (or stay as the location itself), and flows sharing the same
    /// ordered `(origin, dest)` pair are summed. Once a zoom has produced an aggregate, coarser
    /// zooms that map onto the same pair reuse it instead of summing again.
    ///
    /// Endpoints unknown to the tree are kept as raw location IDs at every zoom.
    pub fn aggregate_flows<'f, F, FA>(
        &self,
        flows: &'f [F],
        accessors: &FA,
    ) -> ClusteredFlows<'f, F, A::Id>
    where
        FA: FlowAccessors<F, Id = A::Id>,
    {
        let (min_zoom, max_zoom) = (self.min_zoom(), self.max_zoom());
        let mut aggregates: Vec<AggregateFlow<A::Id>> = Vec::new();
        let mut by_zoom: Vec<Vec<usize>> = vec![Vec::new(); usize::from(max_zoom - min_zoom) + 1];
        let mut finalized: HashMap<(ItemId<A::Id>, ItemId<A::Id>), usize> = HashMap::new();

        for zoom in (min_zoom..max_zoom).rev() {
            let mut zoom_slots: HashMap<(ItemId<A::Id>, ItemId<A::Id>), usize> = HashMap::new();
            let mut order = Vec::new();
            for flow in flows {
                let key = (
                    self.resolve(accessors.origin_id(flow), zoom),
                    self.resolve(accessors.dest_id(flow), zoom),
                );
                if let Some(&slot) = finalized.get(&key) {
                    if let Entry::Vacant(e) = zoom_slots.entry(key) {
                        e.insert(slot);
                        order.push(slot);
                    }
                    continue;
                }
                let slot = *zoom_slots.entry(key).or_insert_with_key(|(origin, dest)| {
                    let slot = aggregates.len();
                    aggregates.push(AggregateFlow {
                        origin: origin.clone(),
                        dest: dest.clone(),
                        magnitude: 0.0,
                    });
                    order.push(slot);
                    slot
                });
                aggregates[slot].magnitude += accessors.magnitude(flow);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                zoom,
                flows = order.len(),
                aggregates = aggregates.len(),
                "aggregated zoom level"
            );

            for (key, slot) in zoom_slots {
                finalized.entry(key).or_insert(slot);
            }
            by_zoom[usize::from(zoom - min_zoom)] = order;
        }

        ClusteredFlows {
            min_zoom,
            max_zoom,
            raw: flows,
            aggregates,
            by_zoom,
        }
    }

    fn resolve(&self, location_id: A::Id, zoom: u8) -> ItemId<A::Id> {
        match self.cluster_for(&location_id, zoom) {
            Some(cluster) => ItemId::Cluster(cluster.id),
            None => ItemId::Location(location_id),
        }
    }
}
