//! JSON response shape.

use cubestack_core::{LeftoverItem, PackResult, PackingStep, PlacedItem};
use cubestack_d3::Bin;
use serde::{Deserialize, Serialize};

/// Box dimensions as (length, width, height).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeView {
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

/// Minimum corner of a placed box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// A placed item. Dimensions are rotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedItemView {
    pub id: String,
    pub request_id: String,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub length: u32,
    pub width: u32,
    pub height: u32,
    pub rotation: usize,
}

impl From<&PlacedItem> for PackedItemView {
    fn from(p: &PlacedItem) -> Self {
        Self {
            id: p.id.clone(),
            request_id: p.request_id.clone(),
            x: p.x(),
            y: p.y(),
            z: p.z(),
            length: p.dimensions.x,
            width: p.dimensions.y,
            height: p.dimensions.z,
            rotation: p.rotation,
        }
    }
}

/// An item that was not placed, with its original dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftoverItemView {
    pub id: String,
    pub request_id: String,
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&LeftoverItem> for LeftoverItemView {
    fn from(l: &LeftoverItem) -> Self {
        Self {
            id: l.id.clone(),
            request_id: l.request_id.clone(),
            length: l.dimensions.x,
            width: l.dimensions.y,
            height: l.dimensions.z,
        }
    }
}

/// One recorded commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    pub step_number: usize,
    pub item_id: String,
    pub position: PositionView,
    pub item_dimensions: SizeView,
    pub rotation: usize,
    pub placed_items_so_far: Vec<PackedItemView>,
}

impl From<&PackingStep> for StepView {
    fn from(step: &PackingStep) -> Self {
        let p = &step.placement;
        Self {
            step_number: step.step_number,
            item_id: p.id.clone(),
            position: PositionView {
                x: p.x(),
                y: p.y(),
                z: p.z(),
            },
            item_dimensions: SizeView {
                length: p.dimensions.x,
                width: p.dimensions.y,
                height: p.dimensions.z,
            },
            rotation: p.rotation,
            placed_items_so_far: step.placed_so_far.iter().map(PackedItemView::from).collect(),
        }
    }
}

/// Response for a single packing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackResponse {
    pub success: bool,
    pub message: String,
    pub packed_items: Vec<PackedItemView>,
    pub leftover_items: Vec<LeftoverItemView>,
    pub bin_size: SizeView,
    /// Placed volume over bin volume, 0.0 - 1.0.
    pub utilization: f64,
    /// Engine time in seconds.
    pub packing_time: f64,
    pub stopped_early: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packing_steps: Option<Vec<StepView>>,
}

impl PackResponse {
    /// Builds a success response from an engine result.
    pub fn from_result(bin: &Bin, result: &PackResult) -> Self {
        let total = result.placed_count() + result.leftover_count();
        let mut message = format!("Packed {} out of {} items", result.placed_count(), total);
        if result.stopped_early() {
            message.push_str(" (time limit reached)");
        }

        Self {
            success: true,
            message,
            packed_items: result.placed.iter().map(PackedItemView::from).collect(),
            leftover_items: result.leftover.iter().map(LeftoverItemView::from).collect(),
            bin_size: SizeView {
                length: bin.length(),
                width: bin.width(),
                height: bin.height(),
            },
            utilization: result.utilization,
            packing_time: result.computation_time_ms as f64 / 1000.0,
            stopped_early: result.stopped_early(),
            strategy: result.strategy.clone(),
            packing_steps: result
                .steps
                .as_ref()
                .map(|steps| steps.iter().map(StepView::from).collect()),
        }
    }

    /// Builds a failure response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            packed_items: Vec::new(),
            leftover_items: Vec::new(),
            bin_size: SizeView::default(),
            utilization: 0.0,
            packing_time: 0.0,
            stopped_early: false,
            strategy: None,
            packing_steps: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubestack_core::{Config, Solver};
    use cubestack_d3::{GreedyPacker, ItemSpec};

    #[test]
    fn test_from_result() {
        let bin = Bin::new(6, 6, 10);
        let items = vec![
            ItemSpec::new("A", 6, 6, 4),
            ItemSpec::new("B", 6, 6, 4),
            ItemSpec::new("C", 6, 6, 4),
        ];
        let config = Config::default().with_step_recording(true);
        let result = GreedyPacker::new(config).solve(&items, &bin).unwrap();
        let response = PackResponse::from_result(&bin, &result);

        assert!(response.success);
        assert_eq!(response.message, "Packed 2 out of 3 items");
        assert_eq!(response.packed_items[1].z, 4);
        assert_eq!(response.leftover_items[0].id, "C");
        assert_eq!(response.bin_size.height, 10);

        let steps = response.packing_steps.as_ref().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].position, PositionView { x: 0, y: 0, z: 4 });
        assert_eq!(steps[1].placed_items_so_far.len(), 2);
    }

    #[test]
    fn test_steps_omitted_when_not_recorded() {
        let bin = Bin::new(10, 10, 10);
        let result = GreedyPacker::default_config()
            .solve(&[ItemSpec::new("A", 1, 1, 1)], &bin)
            .unwrap();

        let json = serde_json::to_value(PackResponse::from_result(&bin, &result)).unwrap();
        assert!(json.get("packing_steps").is_none());
        assert_eq!(json["packed_items"][0]["id"], "A");
    }

    #[test]
    fn test_failure() {
        let response = PackResponse::failure("No items to pack");
        assert!(!response.success);
        assert!(response.packed_items.is_empty());
    }
}
