//! Step capture for replay and animation.

use cubestack_core::{PackObserver, PackingStep};

/// Append-only log of every commit made during a run.
#[derive(Debug, Clone, Default)]
pub struct StepRecorder {
    steps: Vec<PackingStep>,
}

impl StepRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded steps in commit order.
    pub fn steps(&self) -> &[PackingStep] {
        &self.steps
    }

    /// Returns the number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consumes the recorder and returns the log.
    pub fn into_steps(self) -> Vec<PackingStep> {
        self.steps
    }
}

impl PackObserver for StepRecorder {
    fn on_commit(&mut self, step: &PackingStep) {
        self.steps.push(step.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubestack_core::{Dims, PlacedItem, Position};

    fn step(n: usize) -> PackingStep {
        let placement = PlacedItem {
            id: format!("item-{}", n),
            request_id: "r".into(),
            position: Position::new(0, 0, n as u32),
            rotation: 0,
            dimensions: Dims::new(1, 1, 1),
            original_dimensions: Dims::new(1, 1, 1),
            stackable: true,
        };
        PackingStep {
            step_number: n,
            placed_so_far: vec![placement.clone()],
            placement,
        }
    }

    #[test]
    fn test_recorder_appends_in_order() {
        let mut recorder = StepRecorder::new();
        assert!(recorder.is_empty());

        recorder.on_commit(&step(1));
        recorder.on_commit(&step(2));

        assert_eq!(recorder.len(), 2);
        let numbers: Vec<usize> = recorder.steps().iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(recorder.into_steps()[1].placement.id, "item-2");
    }
}
