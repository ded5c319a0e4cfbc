// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform hash grid backend.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::math;
use crate::types::{Aabb2D, dist_sq};

/// Uniform grid backend.
///
/// Buckets slots into square cells keyed by integer cell coordinates. [`Backend::prepare`] sets
/// the cell size to the upcoming query radius, so a query inspects only the cells overlapping
/// the radius envelope.
pub struct Grid {
    cell: f64,
    entries: Vec<Option<(f64, f64)>>,
    cells: HashMap<(i64, i64), SmallVec<[usize; 4]>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cell: 1.0,
            entries: Vec::new(),
            cells: HashMap::new(),
        }
    }
}

impl Grid {
    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Cell coordinates saturate; projected inputs stay far inside i64."
        )]
        let i = v as i64;
        if (i as f64) > v { i - 1 } else { i }
    }

    fn key_for(&self, x: f64, y: f64) -> (i64, i64) {
        (
            Self::floor_to_i64(x / self.cell),
            Self::floor_to_i64(y / self.cell),
        )
    }
}

impl Backend for Grid {
    fn prepare(&mut self, radius: f64) {
        // Zero or negative radii still need a usable cell size; the distance filter keeps
        // results exact.
        self.cell = if radius > 0.0 { radius } else { 1.0 };
        self.entries.clear();
        self.cells.clear();
    }

    fn insert(&mut self, slot: usize, x: f64, y: f64) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some((x, y));
        let key = self.key_for(x, y);
        self.cells.entry(key).or_default().push(slot);
    }

    fn query_radius<'a>(&'a self, x: f64, y: f64, r: f64) -> Box<dyn Iterator<Item = usize> + 'a> {
        // Negative or NaN radii match nothing, as in `FlatVec`.
        if r.is_nan() || r < 0.0 {
            return Box::new(core::iter::empty());
        }
        let envelope = Aabb2D::around(x, y, r);
        let (min_cx, min_cy) = self.key_for(envelope.min_x, envelope.min_y);
        let (max_cx, max_cy) = self.key_for(envelope.max_x, envelope.max_y);
        let r2 = r * r;
        let mut out = Vec::new();
        // Oversized queries fall back to scanning the occupied cells.
        let span = math::ceil(r / self.cell);
        if span > 8.0 {
            for slots in self.cells.values() {
                self.collect_within(slots, x, y, r2, &mut out);
            }
        } else {
            for cy in min_cy..=max_cy {
                for cx in min_cx..=max_cx {
                    if let Some(slots) = self.cells.get(&(cx, cy)) {
                        self.collect_within(slots, x, y, r2, &mut out);
                    }
                }
            }
        }
        out.sort_unstable();
        Box::new(out.into_iter())
    }
}

impl Grid {
    fn collect_within(&self, slots: &[usize], x: f64, y: f64, r2: f64, out: &mut Vec<usize>) {
        for &s in slots {
            if let Some(Some((px, py))) = self.entries.get(s)
                && dist_sq(x, y, *px, *py) <= r2
            {
                out.push(s);
            }
        }
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("Grid")
            .field("cell", &self.cell)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}
