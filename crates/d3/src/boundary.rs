//! The bin (container) items are packed into.

use cubestack_core::geometry::{Boundary, Dims, Position};
use cubestack_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest floor area, in unit cells, a bin may have.
///
/// The height map keeps one entry per floor cell, so this bounds its memory
/// (about 20 bytes per cell) at 4096 x 4096.
pub const MAX_FLOOR_CELLS: u64 = 1 << 24;

/// A fixed-size rectangular bin. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bin {
    /// Dimensions (length, width, height).
    dimensions: Dims,
}

impl Bin {
    /// Creates a new bin with the given dimensions.
    pub fn new(length: u32, width: u32, height: u32) -> Self {
        Self {
            dimensions: Dims::new(length, width, height),
        }
    }

    /// Returns the length (x extent).
    pub fn length(&self) -> u32 {
        self.dimensions.x
    }

    /// Returns the width (y extent).
    pub fn width(&self) -> u32 {
        self.dimensions.y
    }

    /// Returns the height (z extent).
    pub fn height(&self) -> u32 {
        self.dimensions.z
    }

    /// Returns the number of unit cells on the floor.
    pub fn floor_cells(&self) -> u64 {
        u64::from(self.length()) * u64::from(self.width())
    }

    /// Returns true if the footprint cell (x, y) lies on the bin floor.
    pub fn contains_cell(&self, x: u32, y: u32) -> bool {
        x < self.length() && y < self.width()
    }

    /// Returns true if a box of `dims` at `position` lies entirely inside.
    pub fn contains_box(&self, position: &Position, dims: &Dims) -> bool {
        (0..3).all(|axis| {
            u64::from(position[axis]) + u64::from(dims[axis]) <= u64::from(self.dimensions[axis])
        })
    }
}

impl Boundary for Bin {
    fn dimensions(&self) -> &Dims {
        &self.dimensions
    }

    fn validate(&self) -> Result<()> {
        if self.dimensions.iter().any(|&d| d == 0) {
            return Err(Error::InvalidBin(format!(
                "All dimensions must be positive, got {}x{}x{}",
                self.length(),
                self.width(),
                self.height()
            )));
        }

        if self.floor_cells() > MAX_FLOOR_CELLS {
            return Err(Error::InvalidBin(format!(
                "Floor of {}x{} has {} cells, more than the supported {}",
                self.length(),
                self.width(),
                self.floor_cells(),
                MAX_FLOOR_CELLS
            )));
        }

        Ok(())
    }
}
