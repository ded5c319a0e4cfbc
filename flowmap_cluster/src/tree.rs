// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: construction from the spatial index and item/zoom queries.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::RangeInclusive;
use core::slice;

use flowmap_index::{ClusterIndex, ClusterOptions, NodeKind, WeightedPoint};
use hashbrown::HashMap;
use kurbo::Point;

use crate::error::BuildError;
use crate::types::{ClusterId, Item, ItemId, ItemRef, LocationAccessors, LocationCluster};
use crate::{CLUSTER_RADIUS, MAX_CLUSTER_ZOOM};

/// Immutable multi-zoom hierarchy of locations and clusters.
///
/// Built once from a fixed set of locations; every index is populated before the tree is
/// returned, so all queries take `&self` and the tree can be shared across threads.
pub struct ClusterTree<L, A: LocationAccessors<L>> {
    min_zoom: u8,
    max_zoom: u8,
    locations: Vec<L>,
    accessors: A,
    location_slots: HashMap<A::Id, usize>,
    /// Lowest zoom at which each location (by index) is still its own item.
    min_standalone_zoom: Vec<u8>,
    /// Items per zoom, `items_by_zoom[zoom - min_zoom]`.
    items_by_zoom: Vec<Vec<ItemRef>>,
    clusters: Vec<LocationCluster>,
    cluster_slots: HashMap<ClusterId, usize>,
    /// Enclosing cluster slot per location index, `leaf_clusters[zoom - min_zoom]`.
    /// Empty at `max_zoom`.
    leaf_clusters: Vec<Vec<Option<usize>>>,
}

impl<L, A: LocationAccessors<L>> core::fmt::Debug for ClusterTree<L, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClusterTree")
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("locations", &self.locations.len())
            .field("clusters", &self.clusters.len())
            .finish_non_exhaustive()
    }
}

/// The options [`ClusterTree::build`] clusters with.
pub fn default_options() -> ClusterOptions {
    ClusterOptions {
        min_zoom: 0,
        max_zoom: MAX_CLUSTER_ZOOM,
        radius: CLUSTER_RADIUS,
        ..ClusterOptions::default()
    }
}

impl<L, A: LocationAccessors<L>> ClusterTree<L, A> {
    /// Build a tree over `locations`, weighting each location by `weight(id)`.
    ///
    /// Weights must be finite and non-negative; locations without flows usually weigh `0.0`.
    /// See [`LocationWeights`](crate::LocationWeights) for deriving weights from flows.
    ///
    /// # Errors
    ///
    /// - [`BuildError::DuplicateLocationId`] if two locations share an ID.
    /// - [`BuildError::InvalidWeight`] for a negative or non-finite weight, or one that makes the
    ///   total weight of all locations overflow.
    /// - [`BuildError::InvalidCentroid`] for a non-finite centroid.
    pub fn build<W>(locations: Vec<L>, accessors: A, weight: W) -> Result<Self, BuildError<A::Id>>
    where
        W: Fn(&A::Id) -> f64,
    {
        Self::build_with_options(locations, accessors, weight, default_options())
    }

    /// Like [`build`](Self::build), with explicit clustering options.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build), plus [`BuildError::InvalidOptions`] when the radius is
    /// negative or not finite, or the extent is not a positive finite number.
    pub fn build_with_options<W>(
        locations: Vec<L>,
        accessors: A,
        weight: W,
        options: ClusterOptions,
    ) -> Result<Self, BuildError<A::Id>>
    where
        W: Fn(&A::Id) -> f64,
    {
        if !(options.radius.is_finite() && options.radius >= 0.0)
            || !(options.extent.is_finite() && options.extent > 0.0)
        {
            return Err(BuildError::InvalidOptions {
                radius: options.radius,
                extent: options.extent,
            });
        }

        let mut location_slots = HashMap::with_capacity(locations.len());
        let mut points = Vec::with_capacity(locations.len());
        // Every cluster weight is a partial sum of this total.
        let mut total_weight = 0.0_f64;
        for (index, location) in locations.iter().enumerate() {
            let id = accessors.location_id(location);
            if let Some(&first) = location_slots.get(&id) {
                return Err(BuildError::DuplicateLocationId {
                    id,
                    first,
                    second: index,
                });
            }
            let w = weight(&id);
            total_weight += w;
            if !w.is_finite() || w < 0.0 || !total_weight.is_finite() {
                return Err(BuildError::InvalidWeight { id, weight: w });
            }
            let centroid = accessors.location_centroid(location);
            if !centroid.is_finite() {
                return Err(BuildError::InvalidCentroid { id });
            }
            points.push(WeightedPoint::from_lng_lat(centroid.x, centroid.y, w));
            location_slots.insert(id, index);
        }

        let index = ClusterIndex::load(options, &points);
        let tree = Self::from_index(locations, accessors, location_slots, &index);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            min_zoom = tree.min_zoom,
            max_zoom = tree.max_zoom,
            locations = tree.locations.len(),
            clusters = tree.clusters.len(),
            "built cluster tree"
        );

        Ok(tree)
    }

    fn from_index(
        locations: Vec<L>,
        accessors: A,
        location_slots: HashMap<A::Id, usize>,
        index: &ClusterIndex,
    ) -> Self {
        let (min_zoom, max_zoom) = zoom_bounds(index);
        let n = locations.len();
        let depth = usize::from(max_zoom - min_zoom) + 1;

        let mut items_by_zoom: Vec<Vec<ItemRef>> = vec![Vec::new(); depth];
        let mut leaf_clusters: Vec<Vec<Option<usize>>> = vec![Vec::new(); depth];
        let mut clusters: Vec<LocationCluster> = Vec::new();
        let mut cluster_slots = HashMap::new();
        // Parent cluster slot of every cluster slot, filled in one zoom after the child.
        let mut parent_slots: Vec<Option<usize>> = Vec::new();
        let mut min_standalone_zoom = vec![max_zoom; n];

        for zoom in (min_zoom..=max_zoom).rev() {
            let slot = usize::from(zoom - min_zoom);
            let nodes = index.level(zoom).unwrap_or(&[]);

            // Children come from the already-built finer level, keyed by the parent they name.
            let mut children_by_parent: HashMap<u64, Vec<ItemRef>> = HashMap::new();
            if zoom < max_zoom {
                let finer_nodes = index.level(zoom + 1).unwrap_or(&[]);
                for (node, item) in finer_nodes.iter().zip(&items_by_zoom[slot + 1]) {
                    if let Some(parent) = node.parent_id {
                        children_by_parent.entry(parent).or_default().push(*item);
                    }
                }
            }

            let mut leaves = if zoom < max_zoom {
                vec![None; n]
            } else {
                Vec::new()
            };
            let mut items = Vec::with_capacity(nodes.len());
            for node in nodes {
                match node.kind {
                    NodeKind::Point { index } => {
                        min_standalone_zoom[index] = zoom;
                        items.push(ItemRef::Location(index));
                    }
                    NodeKind::Cluster { id, num_points } => {
                        let cluster_slot = clusters.len();
                        let children = children_by_parent.remove(&id).unwrap_or_default();
                        for child in &children {
                            match *child {
                                ItemRef::Location(i) => leaves[i] = Some(cluster_slot),
                                ItemRef::Cluster(c) => parent_slots[c] = Some(cluster_slot),
                            }
                        }
                        let cluster = LocationCluster {
                            id: ClusterId::new(id),
                            parent_id: if zoom > min_zoom {
                                node.parent_id.map(ClusterId::new)
                            } else {
                                None
                            },
                            name: format!("Cluster #{id} ({num_points} locations)"),
                            zoom,
                            centroid: Point::new(node.lng(), node.lat()),
                            num_points,
                            weight: node.weight,
                            children,
                        };
                        cluster_slots.insert(cluster.id, cluster_slot);
                        clusters.push(cluster);
                        parent_slots.push(None);
                        items.push(ItemRef::Cluster(cluster_slot));
                    }
                }
            }

            // Leaves absorbed one level finer inherit their finer cluster's parent.
            if zoom < max_zoom {
                let finer = &leaf_clusters[slot + 1];
                for (i, leaf) in leaves.iter_mut().enumerate() {
                    if leaf.is_none()
                        && let Some(Some(c)) = finer.get(i)
                    {
                        *leaf = parent_slots[*c];
                    }
                }
            }

            items_by_zoom[slot] = items;
            leaf_clusters[slot] = leaves;
        }

        Self {
            min_zoom,
            max_zoom,
            locations,
            accessors,
            location_slots,
            min_standalone_zoom,
            items_by_zoom,
            clusters,
            cluster_slots,
            leaf_clusters,
        }
    }

    /// Coarsest zoom with its own item list.
    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    /// Finest zoom with its own item list; every location stands alone there.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// `min_zoom..=max_zoom`.
    pub fn zoom_range(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }

    /// The locations the tree was built from, in input order.
    pub fn locations(&self) -> &[L] {
        &self.locations
    }

    /// The accessors the tree was built with.
    pub fn accessors(&self) -> &A {
        &self.accessors
    }

    /// All clusters of all zoom levels, finest zoom first.
    pub fn clusters(&self) -> slice::Iter<'_, LocationCluster> {
        self.clusters.iter()
    }

    fn zoom_slot(&self, zoom: u8) -> Option<usize> {
        self.zoom_range()
            .contains(&zoom)
            .then(|| usize::from(zoom - self.min_zoom))
    }

    /// Items visible at `zoom`, or the raw locations when `zoom` is `None`.
    ///
    /// Returns `None` for a zoom outside [`zoom_range`](Self::zoom_range).
    pub fn items_at(&self, zoom: Option<u8>) -> Option<Items<'_, L>> {
        match zoom {
            None => Some(Items {
                locations: &self.locations,
                clusters: &self.clusters,
                inner: ItemsInner::Raw(self.locations.iter()),
            }),
            Some(zoom) => {
                let slot = self.zoom_slot(zoom)?;
                Some(self.items_from(&self.items_by_zoom[slot]))
            }
        }
    }

    fn items_from<'a>(&'a self, refs: &'a [ItemRef]) -> Items<'a, L> {
        Items {
            locations: &self.locations,
            clusters: &self.clusters,
            inner: ItemsInner::Refs(refs.iter()),
        }
    }

    /// Direct children of a cluster of this tree, finer zoom first in index order.
    ///
    /// A cluster that does not belong to this tree has no children here.
    pub fn children<'a>(&'a self, cluster: &LocationCluster) -> Items<'a, L> {
        match self.cluster_by_id(cluster.id) {
            Some(own) => self.items_from(&own.children),
            None => self.items_from(&[]),
        }
    }

    /// The ID of an item.
    pub fn id_of(&self, item: Item<'_, L>) -> ItemId<A::Id> {
        match item {
            Item::Location(location) => ItemId::Location(self.accessors.location_id(location)),
            Item::Cluster(cluster) => ItemId::Cluster(cluster.id),
        }
    }

    /// Look up a cluster by ID.
    pub fn cluster_by_id(&self, id: ClusterId) -> Option<&LocationCluster> {
        self.cluster_slots.get(&id).map(|&slot| &self.clusters[slot])
    }

    /// Look up a location by ID.
    pub fn location_by_id(&self, id: &A::Id) -> Option<&L> {
        self.location_slots.get(id).map(|&slot| &self.locations[slot])
    }

    /// The lowest zoom at which the location is still shown on its own.
    ///
    /// Below this zoom the location is absorbed into a cluster. `None` for unknown IDs.
    pub fn min_zoom_for(&self, location_id: &A::Id) -> Option<u8> {
        self.location_slots
            .get(location_id)
            .map(|&slot| self.min_standalone_zoom[slot])
    }

    /// Append to `out` the IDs that represent `item` at `target_zoom`.
    ///
    /// A cluster coarser than `target_zoom` expands into its children, recursively; any other item
    /// contributes its own ID. Only `out` is modified.
    pub fn expand_to_leaf_or_cluster_ids(
        &self,
        item: Item<'_, L>,
        target_zoom: u8,
        out: &mut Vec<ItemId<A::Id>>,
    ) {
        match item {
            Item::Cluster(cluster) if target_zoom > cluster.zoom => {
                for child in self.children(cluster) {
                    self.expand_to_leaf_or_cluster_ids(child, target_zoom, out);
                }
            }
            _ => out.push(self.id_of(item)),
        }
    }

    /// The cluster that absorbs the location at `zoom`.
    ///
    /// `None` when the location is its own item at that zoom, the ID is unknown, or `zoom` is
    /// outside the tree's range.
    pub fn cluster_for(&self, location_id: &A::Id, zoom: u8) -> Option<&LocationCluster> {
        let leaves = &self.leaf_clusters[self.zoom_slot(zoom)?];
        let index = *self.location_slots.get(location_id)?;
        leaves.get(index).copied().flatten().map(|slot| &self.clusters[slot])
    }

    /// All leaf locations beneath an item, in child order.
    pub fn leaves_of<'a>(&'a self, item: Item<'a, L>) -> Vec<&'a L> {
        let mut out = Vec::new();
        self.collect_leaves(item, &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, item: Item<'a, L>, out: &mut Vec<&'a L>) {
        match item {
            Item::Location(location) => out.push(location),
            Item::Cluster(cluster) => {
                for child in self.children(cluster) {
                    self.collect_leaves(child, out);
                }
            }
        }
    }
}

/// `(min_zoom, max_zoom)` of the materialized hierarchy.
///
/// `max_zoom` is the coarsest level that still has as many nodes as the leaf level; `min_zoom`
/// is the finest level that has as few nodes as the coarsest one, capped at `max_zoom`.
fn zoom_bounds(index: &ClusterIndex) -> (u8, u8) {
    let counts: Vec<usize> = index.node_counts().collect();
    let (Some(&coarsest), Some(&finest)) = (counts.first(), counts.last()) else {
        return (index.min_zoom(), index.min_zoom());
    };
    let max_i = counts.iter().position(|&c| c == finest).unwrap_or(0);
    let min_i = counts
        .iter()
        .rposition(|&c| c == coarsest)
        .unwrap_or(0)
        .min(max_i);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Level offsets are bounded by the index's zoom range."
    )]
    let bounds = (
        index.min_zoom() + min_i as u8,
        index.min_zoom() + max_i as u8,
    );
    bounds
}

/// Iterator over the [`Item`]s of a zoom level, a cluster's children, or the raw locations.
#[derive(Debug)]
pub struct Items<'a, L> {
    locations: &'a [L],
    clusters: &'a [LocationCluster],
    inner: ItemsInner<'a, L>,
}

#[derive(Debug)]
enum ItemsInner<'a, L> {
    Raw(slice::Iter<'a, L>),
    Refs(slice::Iter<'a, ItemRef>),
}

impl<L> Clone for Items<'_, L> {
    fn clone(&self) -> Self {
        Self {
            locations: self.locations,
            clusters: self.clusters,
            inner: match &self.inner {
                ItemsInner::Raw(it) => ItemsInner::Raw(it.clone()),
                ItemsInner::Refs(it) => ItemsInner::Refs(it.clone()),
            },
        }
    }
}

impl<'a, L> Iterator for Items<'a, L> {
    type Item = Item<'a, L>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ItemsInner::Raw(it) => it.next().map(Item::Location),
            ItemsInner::Refs(it) => it.next().map(|r| match *r {
                ItemRef::Location(i) => Item::Location(&self.locations[i]),
                ItemRef::Cluster(c) => Item::Cluster(&self.clusters[c]),
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ItemsInner::Raw(it) => it.size_hint(),
            ItemsInner::Refs(it) => it.size_hint(),
        }
    }
}

impl<L> ExactSizeIterator for Items<'_, L> {}
