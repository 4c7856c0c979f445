//! Placement legality predicates.
//!
//! A candidate (x, y, rotated dims) is legal when, in order:
//!
//! 1. **Bounds**: the footprint fits the floor and the item's top, resting on
//!    the surface at (x, y), stays at or below the bin height.
//! 2. **Support**: every cell under the footprint has the same height.
//! 3. **Stacking**: no cell under the footprint is topped by a non-stackable
//!    item.
//! 4. **No-overlap** (optional): the resulting box intersects no placed box.
//!
//! Predicates are ordered cheapest first and evaluation stops at the first
//! failure.

use crate::boundary::Bin;
use crate::geometry::Cuboid;
use crate::height_map::HeightMap;
use cubestack_core::{Dims, PlacedItem, Position};

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Footprint leaves the floor or the top exceeds the bin height.
    OutOfBounds,
    /// The surface under the footprint is not flat.
    UnevenSupport,
    /// The item would rest on a non-stackable item.
    NotStackable,
    /// The box intersects an already placed box.
    Overlap,
}

/// Evaluates the legality predicates against the current packing state.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintChecker<'a> {
    bin: &'a Bin,
    height_map: &'a HeightMap,
    placed: &'a [PlacedItem],
    check_overlap: bool,
}

impl<'a> ConstraintChecker<'a> {
    /// Creates a checker over a bin, its height map and the placed set.
    pub fn new(bin: &'a Bin, height_map: &'a HeightMap, placed: &'a [PlacedItem]) -> Self {
        Self {
            bin,
            height_map,
            placed,
            check_overlap: true,
        }
    }

    /// Enables or disables the pairwise overlap predicate.
    pub fn with_overlap_check(mut self, enabled: bool) -> Self {
        self.check_overlap = enabled;
        self
    }

    /// Bounds predicate.
    pub fn within_bounds(&self, x: u32, y: u32, dims: &Dims) -> bool {
        if !self.bin.contains_cell(x, y) {
            return false;
        }
        let reach = |origin: u32, extent: u32| u64::from(origin) + u64::from(extent);
        if reach(x, dims.x) > u64::from(self.bin.length())
            || reach(y, dims.y) > u64::from(self.bin.width())
        {
            return false;
        }
        reach(self.height_map.height_at(x, y), dims.z) <= u64::from(self.bin.height())
    }

    /// Support predicate. Returns the resting height when the surface is flat.
    ///
    /// Only meaningful once [`within_bounds`](Self::within_bounds) holds.
    pub fn flat_support(&self, x: u32, y: u32, dims: &Dims) -> Option<u32> {
        self.height_map.flat_surface(x, y, dims.x, dims.y)
    }

    /// Stacking predicate.
    pub fn supports_stacking(&self, x: u32, y: u32, dims: &Dims) -> bool {
        self.height_map
            .owners_under(x, y, dims.x, dims.y)
            .into_iter()
            .all(|owner| self.placed[owner].stackable)
    }

    /// No-overlap predicate against every placed box.
    pub fn no_overlap(&self, position: &Position, dims: &Dims) -> bool {
        let candidate = Cuboid::new(*position, *dims);
        !self
            .placed
            .iter()
            .any(|placed| candidate.overlaps(&Cuboid::from(placed)))
    }

    /// Runs every predicate and returns the resting height `z` on success.
    pub fn check(&self, x: u32, y: u32, dims: &Dims) -> Result<u32, Violation> {
        if !self.within_bounds(x, y, dims) {
            return Err(Violation::OutOfBounds);
        }

        let z = self
            .flat_support(x, y, dims)
            .ok_or(Violation::UnevenSupport)?;

        if !self.supports_stacking(x, y, dims) {
            return Err(Violation::NotStackable);
        }

        if self.check_overlap && !self.no_overlap(&Position::new(x, y, z), dims) {
            return Err(Violation::Overlap);
        }

        Ok(z)
    }
}
