//! Solver traits and configuration.

use crate::geometry::{Boundary, Geometry, RotationMode};
use crate::placement::PackingStep;
use crate::result::PackResult;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cap on candidate anchor points per selection round.
pub const DEFAULT_MAX_CANDIDATES: usize = 50;

/// Default wall-clock budget in milliseconds.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 30_000;

/// How the driving loop picks the next placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionPolicy {
    /// Each iteration scores every (item, position, rotation) combination and
    /// commits the single best one.
    #[default]
    BestOfAll,
    /// Items are visited in input order; each takes the first feasible
    /// position in generator order.
    FirstFit,
}

impl SelectionPolicy {
    /// Returns the policy name used in results and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::BestOfAll => "best_of_all",
            Self::FirstFit => "first_fit",
        }
    }
}

/// Coefficients of the placement score terms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreWeights {
    /// Weight of the low-and-near-origin position term.
    pub position: f64,
    /// Weight of the corner affinity term.
    pub corner: f64,
    /// Weight of the item volume term.
    pub volume: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            position: 1.0,
            corner: 1.0,
            volume: 1.0,
        }
    }
}

impl ScoreWeights {
    /// Sets the position weight.
    pub fn with_position(mut self, weight: f64) -> Self {
        self.position = weight;
        self
    }

    /// Sets the corner weight.
    pub fn with_corner(mut self, weight: f64) -> Self {
        self.corner = weight;
        self
    }

    /// Sets the volume weight.
    pub fn with_volume(mut self, weight: f64) -> Self {
        self.volume = weight;
        self
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("position", self.position),
            ("corner", self.corner),
            ("volume", self.volume),
        ] {
            if !value.is_finite() {
                return Err(Error::ConfigError(format!(
                    "Score weight '{}' must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Common configuration for solvers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Selection policy.
    pub policy: SelectionPolicy,

    /// Orientation mode for every item of the run.
    pub rotation_mode: RotationMode,

    /// Placement score weights.
    pub weights: ScoreWeights,

    /// Maximum computation time in milliseconds (`None` = unlimited).
    pub time_limit_ms: Option<u64>,

    /// Maximum number of candidate anchors evaluated per round.
    pub max_candidates: usize,

    /// Test candidates against every placed box, not only the height map.
    pub check_overlap: bool,

    /// Rebuild the height map after every commit and compare.
    pub verify_height_map: bool,

    /// Capture a step log in the result.
    pub record_steps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::default(),
            rotation_mode: RotationMode::default(),
            weights: ScoreWeights::default(),
            time_limit_ms: Some(DEFAULT_TIME_LIMIT_MS),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            check_overlap: true,
            verify_height_map: true,
            record_steps: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selection policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the rotation mode.
    pub fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotation_mode = mode;
        self
    }

    /// Sets the score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Removes the time limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    /// Sets the candidate cap.
    pub fn with_max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    /// Enables or disables the pairwise overlap predicate.
    pub fn with_overlap_check(mut self, enabled: bool) -> Self {
        self.check_overlap = enabled;
        self
    }

    /// Enables or disables height map verification after each commit.
    pub fn with_height_map_verification(mut self, enabled: bool) -> Self {
        self.verify_height_map = enabled;
        self
    }

    /// Enables or disables step recording.
    pub fn with_step_recording(mut self, enabled: bool) -> Self {
        self.record_steps = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(Error::ConfigError(
                "max_candidates must be at least 1".into(),
            ));
        }
        self.weights.validate()
    }
}

/// Passive observer of committed placements.
///
/// Observers receive immutable data only and cannot influence the run.
pub trait PackObserver {
    /// Called once after every commit.
    fn on_commit(&mut self, step: &PackingStep);
}

/// Trait for packing solvers.
pub trait Solver {
    /// The item type this solver handles.
    type Item: Geometry;
    /// The container type this solver handles.
    type Bin: Boundary;

    /// Packs `items` into `bin`.
    fn solve(&self, items: &[Self::Item], bin: &Self::Bin) -> Result<PackResult>;

    /// Packs `items` into `bin`, reporting every commit to `observer`.
    fn solve_with_observer(
        &self,
        items: &[Self::Item],
        bin: &Self::Bin,
        observer: &mut dyn PackObserver,
    ) -> Result<PackResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.policy, SelectionPolicy::BestOfAll);
        assert_eq!(config.rotation_mode, RotationMode::LockAxis);
        assert_eq!(config.time_limit_ms, Some(30_000));
        assert_eq!(config.max_candidates, 50);
        assert_eq!(config.weights, ScoreWeights::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_policy(SelectionPolicy::FirstFit)
            .with_rotation_mode(RotationMode::Free)
            .without_time_limit()
            .with_step_recording(true);

        assert_eq!(config.policy.name(), "first_fit");
        assert_eq!(config.rotation_mode, RotationMode::Free);
        assert!(config.time_limit_ms.is_none());
        assert!(config.record_steps);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::new().with_max_candidates(0).validate().is_err());

        let weights = ScoreWeights::default().with_volume(f64::NAN);
        assert!(Config::new().with_weights(weights).validate().is_err());
    }
}
