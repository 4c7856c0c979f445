//! Placement scoring.
//!
//! Each term is normalised to roughly (0, 1] so the caller's weights trade
//! them off on a common scale. Higher scores are better.

use crate::boundary::Bin;
use cubestack_core::geometry::{volume_of, Boundary};
use cubestack_core::{Dims, ScoreWeights};

/// Scores (rotated dims, position) pairs for a fixed bin.
#[derive(Debug, Clone, Copy)]
pub struct PlacementScorer {
    length: f64,
    width: f64,
    height: f64,
    volume: f64,
    weights: ScoreWeights,
}

impl PlacementScorer {
    /// Creates a scorer for `bin` with the given weights.
    pub fn new(bin: &Bin, weights: ScoreWeights) -> Self {
        Self {
            length: f64::from(bin.length()),
            width: f64::from(bin.width()),
            height: f64::from(bin.height()),
            volume: bin.measure() as f64,
            weights,
        }
    }

    /// Low-and-near-origin preference.
    ///
    /// Any decrease in `z` outweighs every possible difference in `x + y`.
    pub fn position_term(&self, x: u32, y: u32, z: u32) -> f64 {
        let span = self.length + self.width;
        let level = (self.height - f64::from(z)) * span;
        let floor = span - f64::from(x) - f64::from(y);
        (level + floor) / ((self.height + 1.0) * span)
    }

    /// Affinity for the origin corner.
    pub fn corner_term(&self, x: u32, y: u32) -> f64 {
        1.0 / (f64::from(x) + f64::from(y) + 1.0)
    }

    /// Share of the bin the item would fill; favours large items early.
    pub fn volume_term(&self, dims: &Dims) -> f64 {
        volume_of(dims) as f64 / self.volume
    }

    /// Weighted score of placing a box of `dims` at (x, y, z).
    pub fn score(&self, dims: &Dims, x: u32, y: u32, z: u32) -> f64 {
        self.weights.position * self.position_term(x, y, z)
            + self.weights.corner * self.corner_term(x, y)
            + self.weights.volume * self.volume_term(dims)
    }
}
