//! Placement records produced by a packing run.

use crate::geometry::{volume_of, Dims, ItemId, Position};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An item committed to a position inside the bin.
///
/// Once created by the engine, a placement is never moved or rotated again
/// during the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedItem {
    /// The ID of the placed item.
    pub id: ItemId,

    /// Request group the item belongs to.
    pub request_id: ItemId,

    /// Minimum corner (x, y, z).
    pub position: Position,

    /// Rotation id applied to the original dimensions.
    pub rotation: usize,

    /// Dimensions after rotation.
    pub dimensions: Dims,

    /// Dimensions as supplied by the caller.
    pub original_dimensions: Dims,

    /// Whether other items may rest on this one.
    pub stackable: bool,
}

impl PlacedItem {
    /// Returns the x coordinate.
    pub fn x(&self) -> u32 {
        self.position.x
    }

    /// Returns the y coordinate.
    pub fn y(&self) -> u32 {
        self.position.y
    }

    /// Returns the z coordinate.
    pub fn z(&self) -> u32 {
        self.position.z
    }

    /// Returns the height of the top face.
    pub fn top(&self) -> u32 {
        self.position.z + self.dimensions.z
    }

    /// Returns the volume.
    pub fn volume(&self) -> u64 {
        volume_of(&self.dimensions)
    }
}

/// An item the engine could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeftoverItem {
    /// The ID of the item.
    pub id: ItemId,
    /// Request group the item belongs to.
    pub request_id: ItemId,
    /// Original dimensions.
    pub dimensions: Dims,
}

/// One commit of a packing run, as captured by a step recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingStep {
    /// 1-based commit number.
    pub step_number: usize,
    /// The placement committed in this step.
    pub placement: PlacedItem,
    /// Every placement made so far, this one included, in commit order.
    pub placed_so_far: Vec<PlacedItem>,
}
