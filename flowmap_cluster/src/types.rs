// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the cluster tree: identifiers, clusters, items, and accessors.

use alloc::string::String;
use core::fmt;
use core::hash::Hash;

use kurbo::Point;

/// Prefix of the textual form of every [`ClusterId`].
pub const CLUSTER_ID_PREFIX: &str = "cluster::";

/// Identifier of a synthesized cluster.
///
/// Wraps the numeric ID assigned by the spatial index. IDs are distinct across all zoom levels of
/// one [`ClusterTree`](crate::ClusterTree) but are not stable across rebuilds.
///
/// The textual form is namespaced with [`CLUSTER_ID_PREFIX`], so it never collides with a location
/// ID that does not itself start with the prefix:
///
/// ```
/// use flowmap_cluster::ClusterId;
///
/// let id = ClusterId::new(97);
/// assert_eq!(id.to_string(), "cluster::97");
/// assert_eq!(ClusterId::parse("cluster::97"), Some(id));
/// assert_eq!(ClusterId::parse("ZH"), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Wrap a raw numeric cluster ID.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric ID.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Parse the textual form `cluster::<n>`.
    pub fn parse(s: &str) -> Option<Self> {
        s.strip_prefix(CLUSTER_ID_PREFIX)?.parse().ok().map(Self)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CLUSTER_ID_PREFIX}{}", self.0)
    }
}

/// Whether `s` carries the cluster ID prefix.
pub fn is_cluster_id(s: &str) -> bool {
    s.starts_with(CLUSTER_ID_PREFIX)
}

/// Identifier of an [`Item`]: either a caller location ID or a cluster ID.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemId<I> {
    /// A caller-defined location ID.
    Location(I),
    /// A synthesized cluster.
    Cluster(ClusterId),
}

impl<I> ItemId<I> {
    /// Whether this identifies a cluster.
    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    /// The location ID, if this identifies a location.
    pub fn as_location(&self) -> Option<&I> {
        match self {
            Self::Location(id) => Some(id),
            Self::Cluster(_) => None,
        }
    }

    /// The cluster ID, if this identifies a cluster.
    pub fn as_cluster(&self) -> Option<ClusterId> {
        match self {
            Self::Cluster(id) => Some(*id),
            Self::Location(_) => None,
        }
    }
}

impl<I: fmt::Display> fmt::Display for ItemId<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(id) => id.fmt(f),
            Self::Cluster(id) => id.fmt(f),
        }
    }
}

/// Reference to a child or zoom-level entry, resolved against the owning tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ItemRef {
    /// Index into the tree's locations.
    Location(usize),
    /// Slot in the tree's cluster arena.
    Cluster(usize),
}

/// A group of locations and finer clusters represented by one node at a given zoom.
///
/// Created once while building a [`ClusterTree`](crate::ClusterTree) and immutable afterwards.
/// Use [`ClusterTree::children`](crate::ClusterTree::children) to walk its direct children.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationCluster {
    /// Unique ID within the owning tree.
    pub id: ClusterId,
    /// The cluster one zoom level coarser that contains this one; `None` at the tree's `min_zoom`.
    pub parent_id: Option<ClusterId>,
    /// Human-readable label.
    pub name: String,
    /// Zoom level at which this cluster is the representative node.
    pub zoom: u8,
    /// Weighted position, `x` = longitude and `y` = latitude in degrees.
    pub centroid: Point,
    /// Number of leaf locations beneath this cluster.
    pub num_points: usize,
    /// Sum of the weights of the leaf locations beneath this cluster.
    pub weight: f64,
    pub(crate) children: alloc::vec::Vec<ItemRef>,
}

impl LocationCluster {
    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// A node visible at some zoom: a caller location or a synthesized cluster.
#[derive(Debug)]
pub enum Item<'a, L> {
    /// An original location, shown individually.
    Location(&'a L),
    /// A cluster standing in for several locations.
    Cluster(&'a LocationCluster),
}

impl<L> Clone for Item<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L> Copy for Item<'_, L> {}

impl<'a, L> Item<'a, L> {
    /// Whether this item is a cluster.
    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    /// The cluster, if this item is one.
    pub fn as_cluster(&self) -> Option<&'a LocationCluster> {
        match *self {
            Self::Cluster(c) => Some(c),
            Self::Location(_) => None,
        }
    }

    /// The location, if this item is one.
    pub fn as_location(&self) -> Option<&'a L> {
        match *self {
            Self::Location(l) => Some(l),
            Self::Cluster(_) => None,
        }
    }

    /// The cluster's representative zoom; `None` for locations.
    pub fn zoom(&self) -> Option<u8> {
        self.as_cluster().map(|c| c.zoom)
    }
}

/// Reads IDs and centroids out of caller location records.
///
/// ```
/// use flowmap_cluster::LocationAccessors;
/// use kurbo::Point;
///
/// struct Station {
///     code: &'static str,
///     lon: f64,
///     lat: f64,
/// }
///
/// struct StationAccessors;
///
/// impl LocationAccessors<Station> for StationAccessors {
///     type Id = &'static str;
///
///     fn location_id(&self, s: &Station) -> Self::Id {
///         s.code
///     }
///
///     fn location_centroid(&self, s: &Station) -> Point {
///         Point::new(s.lon, s.lat)
///     }
/// }
/// ```
pub trait LocationAccessors<L> {
    /// Location ID type; must be unique per location.
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// The location's ID.
    fn location_id(&self, location: &L) -> Self::Id;

    /// The location's centroid, `x` = longitude and `y` = latitude in degrees.
    fn location_centroid(&self, location: &L) -> Point;
}

/// Reads endpoints and magnitude out of caller flow records.
pub trait FlowAccessors<F> {
    /// Location ID type of the endpoints.
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// ID of the origin location.
    fn origin_id(&self, flow: &F) -> Self::Id;

    /// ID of the destination location.
    fn dest_id(&self, flow: &F) -> Self::Id;

    /// Flow magnitude (for example a trip count).
    fn magnitude(&self, flow: &F) -> f64;
}
