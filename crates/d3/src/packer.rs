//! Greedy height-map packer.
//!
//! The packer repeatedly picks a placement among the anchors proposed by
//! [`CandidateGenerator`], filters them through [`ConstraintChecker`] and,
//! depending on [`SelectionPolicy`], either commits the first legal one or the
//! best one according to [`PlacementScorer`].

use crate::boundary::Bin;
use crate::candidates::{Candidate, CandidateGenerator};
use crate::constraints::ConstraintChecker;
use crate::geometry::ItemSpec;
use crate::height_map::HeightMap;
use crate::packing_utils::build_leftover_list;
use crate::recorder::StepRecorder;
use crate::scoring::PlacementScorer;
use cubestack_core::geometry::{Boundary, Dims, Geometry, Position};
use cubestack_core::solver::{Config, PackObserver, SelectionPolicy, Solver};
use cubestack_core::{Error, PackResult, PackingStep, PlacedItem, Result, Termination};

use std::time::Instant;

/// Heuristic 3D packer over a single bin.
#[derive(Debug, Clone, Default)]
pub struct GreedyPacker {
    config: Config,
}

impl GreedyPacker {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn run(
        &self,
        items: &[ItemSpec],
        bin: &Bin,
        observer: Option<&mut dyn PackObserver>,
    ) -> Result<PackResult> {
        self.config.validate()?;
        bin.validate()?;
        for item in items {
            item.validate()?;
        }

        let mut state = PackState::new(bin, &self.config, items.len(), observer);

        let termination = match self.config.policy {
            SelectionPolicy::FirstFit => self.first_fit(items, &mut state)?,
            SelectionPolicy::BestOfAll => self.best_of_all(items, &mut state)?,
        };

        if termination == Termination::BudgetExceeded {
            log::warn!(
                "Time budget of {} ms exceeded after {} iterations; returning {} of {} items placed",
                self.config.time_limit_ms.unwrap_or_default(),
                state.iterations,
                state.placed.len(),
                items.len()
            );
        }

        let mut result = PackResult::new().with_strategy(self.config.policy.name());
        result.leftover = build_leftover_list(items, &state.is_placed);
        result.placed = state.placed;
        result.calculate_utilization(bin.measure());
        result.termination = termination;
        result.steps = state.recorder.map(StepRecorder::into_steps);
        result.iterations = state.iterations;
        result.computation_time_ms = state.start.elapsed().as_millis() as u64;

        log::info!(
            "{}: placed {}/{} items, utilization {} in {} ms",
            self.config.policy.name(),
            result.placed_count(),
            items.len(),
            result.utilization_percent(),
            result.computation_time_ms
        );

        Ok(result)
    }

    /// Visits items in input order, committing each at the first legal
    /// (candidate, rotation) in generator order.
    fn first_fit(&self, items: &[ItemSpec], state: &mut PackState<'_, '_>) -> Result<Termination> {
        for (index, item) in items.iter().enumerate() {
            if state.budget_exceeded() {
                return Ok(Termination::BudgetExceeded);
            }
            state.iterations += 1;

            let candidates = state.candidates();
            let checker = state.checker();
            let found = candidates.iter().find_map(|c| {
                self.config.rotation_mode.rotation_ids().find_map(|rotation| {
                    let dims = item.rotated(rotation, self.config.rotation_mode);
                    checker
                        .check(c.x, c.y, &dims)
                        .ok()
                        .map(|z| (rotation, Position::new(c.x, c.y, z), dims))
                })
            });

            match found {
                Some((rotation, position, dims)) => {
                    state.commit(index, item, rotation, position, dims)?;
                }
                None => log::debug!("No legal placement for '{}'", item.id()),
            }
        }

        Ok(Termination::Completed)
    }

    /// Scores every (unplaced item, candidate, rotation) each round and
    /// commits the single best one.
    fn best_of_all(&self, items: &[ItemSpec], state: &mut PackState<'_, '_>) -> Result<Termination> {
        loop {
            if state.unplaced_count() == 0 {
                return Ok(Termination::Completed);
            }
            if state.budget_exceeded() {
                return Ok(Termination::BudgetExceeded);
            }
            state.iterations += 1;

            let candidates = state.candidates();
            let Some(choice) = self.best_choice(items, state, &candidates) else {
                return Ok(Termination::Completed);
            };

            let item = &items[choice.index];
            state.commit(choice.index, item, choice.rotation, choice.position, choice.dims)?;
        }
    }

    fn best_choice(
        &self,
        items: &[ItemSpec],
        state: &PackState<'_, '_>,
        candidates: &[Candidate],
    ) -> Option<Choice> {
        let checker = state.checker();
        let mut best: Option<Choice> = None;

        for (index, item) in items.iter().enumerate() {
            if state.is_placed[index] {
                continue;
            }
            for c in candidates {
                for rotation in self.config.rotation_mode.rotation_ids() {
                    let dims = item.rotated(rotation, self.config.rotation_mode);
                    let Ok(z) = checker.check(c.x, c.y, &dims) else {
                        continue;
                    };
                    let score = state.scorer.score(&dims, c.x, c.y, z);
                    // Earlier combinations keep ties.
                    if best.as_ref().map_or(true, |b| score > b.score) {
                        best = Some(Choice {
                            index,
                            rotation,
                            position: Position::new(c.x, c.y, z),
                            dims,
                            score,
                        });
                    }
                }
            }
        }

        best
    }
}

impl Solver for GreedyPacker {
    type Item = ItemSpec;
    type Bin = Bin;

    fn solve(&self, items: &[Self::Item], bin: &Self::Bin) -> Result<PackResult> {
        self.run(items, bin, None)
    }

    fn solve_with_observer(
        &self,
        items: &[Self::Item],
        bin: &Self::Bin,
        observer: &mut dyn PackObserver,
    ) -> Result<PackResult> {
        self.run(items, bin, Some(observer))
    }
}

/// Best placement found in a selection round.
#[derive(Debug, Clone, Copy)]
struct Choice {
    index: usize,
    rotation: usize,
    position: Position,
    dims: Dims,
    score: f64,
}

/// Mutable state of one run.
struct PackState<'a, 'o> {
    bin: &'a Bin,
    config: &'a Config,
    start: Instant,
    height_map: HeightMap,
    placed: Vec<PlacedItem>,
    is_placed: Vec<bool>,
    generator: CandidateGenerator,
    scorer: PlacementScorer,
    iterations: u64,
    observer: Option<&'o mut dyn PackObserver>,
    recorder: Option<StepRecorder>,
}

impl<'a, 'o> PackState<'a, 'o> {
    fn new(
        bin: &'a Bin,
        config: &'a Config,
        item_count: usize,
        observer: Option<&'o mut dyn PackObserver>,
    ) -> Self {
        Self {
            bin,
            config,
            start: Instant::now(),
            height_map: HeightMap::for_bin(bin),
            placed: Vec::with_capacity(item_count),
            is_placed: vec![false; item_count],
            generator: CandidateGenerator::new(config.max_candidates),
            scorer: PlacementScorer::new(bin, config.weights),
            iterations: 0,
            observer,
            recorder: config.record_steps.then(StepRecorder::new),
        }
    }

    fn budget_exceeded(&self) -> bool {
        self.config
            .time_limit_ms
            .is_some_and(|ms| self.start.elapsed().as_millis() >= u128::from(ms))
    }

    fn unplaced_count(&self) -> usize {
        self.is_placed.iter().filter(|&&p| !p).count()
    }

    fn candidates(&self) -> Vec<Candidate> {
        let candidates = self
            .generator
            .generate(self.bin, &self.height_map, &self.placed);
        log::debug!(
            "Round {}: {} candidates over {} placed items",
            self.iterations,
            candidates.len(),
            self.placed.len()
        );
        candidates
    }

    fn checker(&self) -> ConstraintChecker<'_> {
        ConstraintChecker::new(self.bin, &self.height_map, &self.placed)
            .with_overlap_check(self.config.check_overlap)
    }

    fn commit(
        &mut self,
        index: usize,
        item: &ItemSpec,
        rotation: usize,
        position: Position,
        dims: Dims,
    ) -> Result<()> {
        let placement = PlacedItem {
            id: item.id().clone(),
            request_id: item.request_id().clone(),
            position,
            rotation,
            dimensions: dims,
            original_dimensions: *item.dimensions(),
            stackable: item.is_stackable(),
        };

        log::debug!(
            "Commit #{} '{}' at ({}, {}, {}) rotation {} dims {}x{}x{}",
            self.placed.len() + 1,
            placement.id,
            position.x,
            position.y,
            position.z,
            rotation,
            dims.x,
            dims.y,
            dims.z
        );

        self.height_map.commit(&placement, self.placed.len());
        self.placed.push(placement);
        self.is_placed[index] = true;

        if self.config.verify_height_map {
            let rebuilt = HeightMap::rebuild(self.bin.length(), self.bin.width(), &self.placed);
            if rebuilt != self.height_map {
                return Err(Error::Internal(format!(
                    "Height map diverged from placed set after commit #{}",
                    self.placed.len()
                )));
            }
        }

        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        if self.observer.is_none() && self.recorder.is_none() {
            return;
        }
        let Some(placement) = self.placed.last() else {
            return;
        };

        let step = PackingStep {
            step_number: self.placed.len(),
            placement: placement.clone(),
            placed_so_far: self.placed.clone(),
        };
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_commit(&step);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_commit(&step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cubestack_core::RotationMode;

    fn packer(policy: SelectionPolicy) -> GreedyPacker {
        GreedyPacker::new(Config::default().with_policy(policy))
    }

    #[test]
    fn test_single_item_at_origin() {
        for policy in [SelectionPolicy::FirstFit, SelectionPolicy::BestOfAll] {
            let result = packer(policy)
                .solve(&[ItemSpec::new("A", 5, 5, 5)], &Bin::new(10, 10, 10))
                .unwrap();

            assert_eq!(result.placed.len(), 1);
            assert_eq!(result.placed[0].position, Position::new(0, 0, 0));
            assert_eq!(result.placed[0].rotation, 0);
            assert_relative_eq!(result.utilization, 0.125);
            assert_eq!(result.termination, Termination::Completed);
            assert_eq!(result.strategy.as_deref(), Some(policy.name()));
        }
    }

    #[test]
    fn test_full_layer_stacks() {
        let items = vec![ItemSpec::new("A", 6, 6, 4), ItemSpec::new("B", 6, 6, 4)];
        let result = packer(SelectionPolicy::BestOfAll)
            .solve(&items, &Bin::new(6, 6, 10))
            .unwrap();

        assert_eq!(result.placed[0].position, Position::new(0, 0, 0));
        assert_eq!(result.placed[1].position, Position::new(0, 0, 4));
        assert_relative_eq!(result.utilization, 0.8);
    }

    #[test]
    fn test_rotation_needed_to_fit() {
        let items = vec![ItemSpec::new("A", 3, 8, 2)];
        let result = packer(SelectionPolicy::FirstFit)
            .solve(&items, &Bin::new(10, 5, 10))
            .unwrap();

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.placed[0].rotation, 1);
        assert_eq!(result.placed[0].dimensions, Dims::new(8, 3, 2));
        assert_eq!(result.placed[0].original_dimensions, Dims::new(3, 8, 2));
    }

    #[test]
    fn test_best_of_all_prefers_larger_item() {
        let items = vec![ItemSpec::new("small", 2, 2, 2), ItemSpec::new("large", 5, 5, 5)];
        let result = packer(SelectionPolicy::BestOfAll)
            .solve(&items, &Bin::new(10, 10, 10))
            .unwrap();

        assert_eq!(result.placed[0].id, "large");
        assert_eq!(result.placed[0].position, Position::new(0, 0, 0));
    }

    #[test]
    fn test_first_fit_keeps_input_order() {
        let items = vec![ItemSpec::new("small", 2, 2, 2), ItemSpec::new("large", 5, 5, 5)];
        let result = packer(SelectionPolicy::FirstFit)
            .solve(&items, &Bin::new(10, 10, 10))
            .unwrap();

        assert_eq!(result.placed[0].id, "small");
        assert_eq!(result.placed[1].id, "large");
        assert_eq!(result.placed[1].position, Position::new(2, 0, 0));
    }

    #[test]
    fn test_first_fit_makes_a_single_pass() {
        // B only fits on the shelf formed once C sits beside A.
        let items = vec![
            ItemSpec::new("A", 5, 2, 3),
            ItemSpec::new("B", 6, 1, 1),
            ItemSpec::new("C", 5, 2, 3),
        ];
        let bin = Bin::new(10, 2, 10);

        let first_fit = packer(SelectionPolicy::FirstFit).solve(&items, &bin).unwrap();
        let ids: Vec<&str> = first_fit.placed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(first_fit.placed[1].position, Position::new(5, 0, 0));
        assert_eq!(first_fit.leftover[0].id, "B");

        let best = packer(SelectionPolicy::BestOfAll).solve(&items, &bin).unwrap();
        let ids: Vec<&str> = best.placed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
        assert_eq!(best.placed[2].position, Position::new(0, 0, 3));
    }

    #[test]
    fn test_oversized_item_is_leftover() {
        let items = vec![ItemSpec::new("A", 11, 1, 1), ItemSpec::new("B", 1, 1, 1)];
        let config = Config::default().with_rotation_mode(RotationMode::Free);
        let result = GreedyPacker::new(config)
            .solve(&items, &Bin::new(10, 10, 10))
            .unwrap();

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.leftover.len(), 1);
        assert_eq!(result.leftover[0].id, "A");
        assert_eq!(result.termination, Termination::Completed);
    }

    #[test]
    fn test_zero_budget_stops_immediately() {
        let items = vec![ItemSpec::new("A", 1, 1, 1)];
        for policy in [SelectionPolicy::FirstFit, SelectionPolicy::BestOfAll] {
            let config = Config::default().with_policy(policy).with_time_limit(0);
            let result = GreedyPacker::new(config)
                .solve(&items, &Bin::new(10, 10, 10))
                .unwrap();

            assert!(result.stopped_early());
            assert!(result.placed.is_empty());
            assert_eq!(result.leftover.len(), 1);
            assert_relative_eq!(result.utilization, 0.0);
        }
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let packer = GreedyPacker::default_config();
        assert!(packer
            .solve(&[ItemSpec::new("A", 1, 1, 1)], &Bin::new(0, 10, 10))
            .is_err());
        assert!(packer
            .solve(&[ItemSpec::new("A", 1, 0, 1)], &Bin::new(10, 10, 10))
            .is_err());

        let capped = GreedyPacker::new(Config::default().with_max_candidates(0));
        assert!(matches!(
            capped.solve(&[ItemSpec::new("A", 1, 1, 1)], &Bin::new(10, 10, 10)),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        let result = GreedyPacker::default_config()
            .solve(&[], &Bin::new(10, 10, 10))
            .unwrap();

        assert!(result.placed.is_empty());
        assert!(result.leftover.is_empty());
        assert_relative_eq!(result.utilization, 0.0);
    }

    #[test]
    fn test_step_recording() {
        let items = vec![ItemSpec::new("A", 5, 5, 5), ItemSpec::new("B", 5, 5, 5)];
        let config = Config::default().with_step_recording(true);
        let result = GreedyPacker::new(config)
            .solve(&items, &Bin::new(10, 10, 10))
            .unwrap();

        let steps = result.steps.as_ref().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].step_number, 1);
        assert_eq!(steps[1].placed_so_far, result.placed);
    }

    #[test]
    fn test_non_stackable_base_is_not_loaded() {
        let items = vec![
            ItemSpec::new("base", 10, 10, 2).with_stackable(false),
            ItemSpec::new("top", 2, 2, 2),
        ];
        let result = packer(SelectionPolicy::FirstFit)
            .solve(&items, &Bin::new(10, 10, 10))
            .unwrap();

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.leftover[0].id, "top");
    }
}
