// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `ClusterIndex` API: loading points and reading the per-zoom node forest.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::backend::Backend;
use crate::backends::grid::Grid;
use crate::math;
use crate::project::{x_lng, y_lat};
use crate::types::WeightedPoint;

/// Highest zoom an index can cluster at.
///
/// Cluster IDs reserve their low five bits for `zoom + 1`.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Tuning knobs for [`ClusterIndex::load`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClusterOptions {
    /// Coarsest zoom level to cluster.
    pub min_zoom: u8,
    /// Finest zoom level to cluster; the leaf level sits one above it.
    pub max_zoom: u8,
    /// Cluster radius in tile pixels.
    pub radius: f64,
    /// Tile extent in pixels; `radius / extent` is the radius at zoom 0 in projected units.
    pub extent: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: 16,
            radius: 40.0,
            extent: 512.0,
        }
    }
}

impl ClusterOptions {
    /// Search radius in projected units for clustering at `zoom`.
    pub fn radius_at(&self, zoom: u8) -> f64 {
        self.radius / (self.extent * math::exp2(f64::from(zoom)))
    }
}

/// What a node of the forest stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// An input point, by its position in the slice passed to [`ClusterIndex::load`].
    Point {
        /// Index into the loaded points.
        index: usize,
    },
    /// A synthesized cluster.
    Cluster {
        /// Numeric cluster ID, distinct across all levels of the index.
        id: u64,
        /// Number of input points beneath this cluster.
        num_points: usize,
    },
}

/// A node of one zoom level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClusterNode {
    /// Projected x.
    pub x: f64,
    /// Projected y.
    pub y: f64,
    /// Total weight of the input points beneath this node.
    pub weight: f64,
    /// Cluster one level coarser that absorbed this node, if any.
    ///
    /// `None` when the node passes to the coarser level unchanged, and at the coarsest level.
    pub parent_id: Option<u64>,
    /// Point or cluster.
    pub kind: NodeKind,
}

impl ClusterNode {
    fn leaf(index: usize, p: &WeightedPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            weight: p.weight,
            parent_id: None,
            kind: NodeKind::Point { index },
        }
    }

    /// Whether the node is a synthesized cluster.
    pub fn is_cluster(&self) -> bool {
        matches!(self.kind, NodeKind::Cluster { .. })
    }

    /// The cluster ID, if the node is a cluster.
    pub fn cluster_id(&self) -> Option<u64> {
        match self.kind {
            NodeKind::Cluster { id, .. } => Some(id),
            NodeKind::Point { .. } => None,
        }
    }

    /// Number of input points beneath this node (1 for a point).
    pub fn num_points(&self) -> usize {
        match self.kind {
            NodeKind::Cluster { num_points, .. } => num_points,
            NodeKind::Point { .. } => 1,
        }
    }

    /// Longitude of the node position in degrees.
    pub fn lng(&self) -> f64 {
        x_lng(self.x)
    }

    /// Latitude of the node position in degrees.
    pub fn lat(&self) -> f64 {
        y_lat(self.y)
    }
}

/// Weighted running centroid of a group of nodes.
///
/// Falls back to a point-count mean when every member weighs zero.
#[derive(Default)]
struct Centroid {
    weight: f64,
    wx: f64,
    wy: f64,
    count: usize,
    cx: f64,
    cy: f64,
}

impl Centroid {
    fn add(&mut self, n: &ClusterNode) {
        let count = n.num_points();
        #[allow(
            clippy::cast_precision_loss,
            reason = "Point counts stay far below 2^52."
        )]
        let c = count as f64;
        self.weight += n.weight;
        self.wx += n.x * n.weight;
        self.wy += n.y * n.weight;
        self.count += count;
        self.cx += n.x * c;
        self.cy += n.y * c;
    }

    fn position(&self) -> (f64, f64) {
        if self.weight > 0.0 {
            (self.wx / self.weight, self.wy / self.weight)
        } else {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Point counts stay far below 2^52."
            )]
            let c = self.count as f64;
            (self.cx / c, self.cy / c)
        }
    }
}

/// Multi-zoom clustering of a fixed set of weighted points.
///
/// Built once by [`load`](Self::load); immutable afterwards.
pub struct ClusterIndex {
    options: ClusterOptions,
    len: usize,
    /// `levels[i]` holds zoom `min_zoom + i`; the last entry is the leaf level.
    levels: Vec<Vec<ClusterNode>>,
}

impl Debug for ClusterIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("min_zoom", &self.options.min_zoom)
            .field("max_zoom", &self.options.max_zoom)
            .field("points", &self.len)
            .field("node_counts", &self.node_counts().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ClusterIndex {
    /// Cluster `points` using the default [`Grid`] backend.
    pub fn load(options: ClusterOptions, points: &[WeightedPoint]) -> Self {
        Self::load_with_backend::<Grid>(options, points)
    }

    /// Cluster `points` using a specific neighbor search backend.
    ///
    /// `max_zoom` is capped at [`MAX_SUPPORTED_ZOOM`] and `min_zoom` at `max_zoom`.
    ///
    /// Expects a finite non-negative radius, a finite positive extent, and point weights whose
    /// sum is finite; cluster weights and centroids are undefined otherwise.
    pub fn load_with_backend<B: Backend + Default>(
        options: ClusterOptions,
        points: &[WeightedPoint],
    ) -> Self {
        let max_zoom = options.max_zoom.min(MAX_SUPPORTED_ZOOM);
        let min_zoom = options.min_zoom.min(max_zoom);
        let options = ClusterOptions {
            min_zoom,
            max_zoom,
            ..options
        };

        let depth = usize::from(max_zoom - min_zoom) + 2;
        let mut levels: Vec<Vec<ClusterNode>> = vec![Vec::new(); depth];
        levels[depth - 1] = points
            .iter()
            .enumerate()
            .map(|(i, p)| ClusterNode::leaf(i, p))
            .collect();

        let mut backend = B::default();
        for zoom in (min_zoom..=max_zoom).rev() {
            let slot = usize::from(zoom - min_zoom);
            let (coarser, finer) = levels.split_at_mut(slot + 1);
            coarser[slot] = cluster_level(&mut backend, &mut finer[0], options.radius_at(zoom), zoom);
            #[cfg(feature = "tracing")]
            tracing::debug!(zoom, nodes = coarser[slot].len(), "clustered level");
        }

        Self {
            options,
            len: points.len(),
            levels,
        }
    }

    /// Effective options (with zoom bounds capped).
    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Coarsest clustered zoom.
    pub fn min_zoom(&self) -> u8 {
        self.options.min_zoom
    }

    /// Finest clustered zoom; level `max_zoom + 1` holds the raw points.
    pub fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }

    /// Number of loaded points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no points were loaded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes at `zoom`, for `zoom` in `min_zoom..=max_zoom + 1`.
    pub fn level(&self, zoom: u8) -> Option<&[ClusterNode]> {
        let slot = zoom.checked_sub(self.options.min_zoom)?;
        self.levels.get(usize::from(slot)).map(Vec::as_slice)
    }

    /// All levels from coarsest to the leaf level, paired with their zoom.
    pub fn levels(&self) -> impl ExactSizeIterator<Item = (u8, &[ClusterNode])> + '_ {
        let min_zoom = self.options.min_zoom;
        self.levels.iter().enumerate().map(move |(i, nodes)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "There are at most MAX_SUPPORTED_ZOOM + 2 levels."
            )]
            let zoom = min_zoom + i as u8;
            (zoom, nodes.as_slice())
        })
    }

    /// Node count per level, from coarsest to the leaf level.
    pub fn node_counts(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.levels.iter().map(Vec::len)
    }
}

/// Cluster the nodes of level `zoom + 1` into level `zoom`, recording parents on `finer`.
fn cluster_level<B: Backend>(
    backend: &mut B,
    finer: &mut [ClusterNode],
    radius: f64,
    zoom: u8,
) -> Vec<ClusterNode> {
    backend.prepare(radius);
    for (slot, n) in finer.iter().enumerate() {
        backend.insert(slot, n.x, n.y);
    }

    // Heaviest first; the sort is stable so ties keep level order.
    let mut order: Vec<usize> = (0..finer.len()).collect();
    order.sort_by(|&a, &b| finer[b].weight.total_cmp(&finer[a].weight));

    let mut visited = vec![false; finer.len()];
    let mut out = Vec::new();
    for seed in order {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let (sx, sy) = (finer[seed].x, finer[seed].y);
        let mut members: SmallVec<[usize; 8]> = SmallVec::new();
        members.push(seed);
        for n in backend.query_radius(sx, sy, radius) {
            if !visited[n] {
                visited[n] = true;
                members.push(n);
            }
        }

        if members.len() == 1 && !finer[seed].is_cluster() {
            let mut pass = finer[seed];
            pass.parent_id = None;
            out.push(pass);
            continue;
        }

        let mut centroid = Centroid::default();
        for &m in &members {
            centroid.add(&finer[m]);
        }
        let id = ((seed as u64) << 5) + u64::from(zoom) + 1;
        for &m in &members {
            finer[m].parent_id = Some(id);
        }
        let (x, y) = centroid.position();
        out.push(ClusterNode {
            x,
            y,
            weight: centroid.weight,
            parent_id: None,
            kind: NodeKind::Cluster {
                id,
                num_points: centroid.count,
            },
        });
    }
    out
}
