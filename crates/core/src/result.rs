//! Pack result representation.

use crate::placement::{LeftoverItem, PackingStep, PlacedItem};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a packing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Termination {
    /// No unplaced item admitted a legal placement.
    #[default]
    Completed,
    /// The wall-clock budget ran out; the result is partial but valid.
    BudgetExceeded,
}

/// Result of a packing run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackResult {
    /// Placements in commit order.
    pub placed: Vec<PlacedItem>,

    /// Items that were not placed, in input order.
    pub leftover: Vec<LeftoverItem>,

    /// Utilization ratio (0.0 - 1.0).
    /// Calculated as: total_placed_volume / bin_volume
    pub utilization: f64,

    /// How the run ended.
    pub termination: Termination,

    /// Commit log, present when step recording was requested.
    pub steps: Option<Vec<PackingStep>>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Number of outer iterations of the driving loop.
    pub iterations: u64,

    /// Selection policy used for solving.
    pub strategy: Option<String>,
}

impl PackResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns the number of leftover items.
    pub fn leftover_count(&self) -> usize {
        self.leftover.len()
    }

    /// Returns true if the run hit its time budget.
    pub fn stopped_early(&self) -> bool {
        self.termination == Termination::BudgetExceeded
    }

    /// Returns the total volume of placed items.
    pub fn placed_volume(&self) -> u64 {
        self.placed.iter().map(PlacedItem::volume).sum()
    }

    /// Sets utilization to placed volume over `bin_volume`, 0.0 when nothing
    /// was placed.
    pub fn calculate_utilization(&mut self, bin_volume: u64) {
        self.utilization = if bin_volume == 0 || self.placed.is_empty() {
            0.0
        } else {
            self.placed_volume() as f64 / bin_volume as f64
        };
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Dims, Position};
    use approx::assert_relative_eq;

    fn placed(id: &str, dims: (u32, u32, u32)) -> PlacedItem {
        let dims = Dims::new(dims.0, dims.1, dims.2);
        PlacedItem {
            id: id.to_string(),
            request_id: id.to_string(),
            position: Position::zeros(),
            rotation: 0,
            dimensions: dims,
            original_dimensions: dims,
            stackable: true,
        }
    }

    #[test]
    fn test_result_new() {
        let result = PackResult::new();
        assert!(result.placed.is_empty());
        assert_eq!(result.utilization, 0.0);
        assert!(!result.stopped_early());
    }

    #[test]
    fn test_calculate_utilization() {
        let mut result = PackResult::new();
        result.placed.push(placed("a", (5, 5, 5)));
        result.calculate_utilization(1000);

        assert_relative_eq!(result.utilization, 0.125, epsilon = 1e-12);
        assert_eq!(result.utilization_percent(), "12.5%");
    }

    #[test]
    fn test_empty_utilization_is_zero() {
        let mut result = PackResult::new();
        result.calculate_utilization(1000);
        assert_eq!(result.utilization, 0.0);
    }
}
