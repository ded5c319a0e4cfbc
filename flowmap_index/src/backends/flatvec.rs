// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, dist_sq};

/// Flat vector backend with linear scans.
#[derive(Default)]
pub struct FlatVec {
    entries: Vec<Option<(f64, f64)>>,
}

impl Debug for FlatVec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl Backend for FlatVec {
    fn prepare(&mut self, _radius: f64) {
        self.entries.clear();
    }

    fn insert(&mut self, slot: usize, x: f64, y: f64) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some((x, y));
    }

    fn query_radius<'a>(&'a self, x: f64, y: f64, r: f64) -> Box<dyn Iterator<Item = usize> + 'a> {
        let envelope = Aabb2D::around(x, y, r);
        let r2 = r * r;
        let mut out = Vec::new();
        for (i, slot) in self.entries.iter().enumerate() {
            if let Some((px, py)) = *slot
                && envelope.contains_point(px, py)
                && dist_sq(x, y, px, py) <= r2
            {
                out.push(i);
            }
        }
        Box::new(out.into_iter())
    }
}
