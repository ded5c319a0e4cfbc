// Copyright 2025 the Flowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different neighbor search strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple).
//! - `grid`: uniform hash grid with cells the size of the search radius, so a radius query
//!   touches at most a 3×3 block of cells.
//!
//! Both return matches in ascending slot order, so clustering results do not depend on the
//! backend.

pub mod flatvec;
pub mod grid;

pub use flatvec::FlatVec;
pub use grid::Grid;
