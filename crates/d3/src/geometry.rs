//! Item definitions and axis-aligned box overlap.

use cubestack_core::geometry::{rotate, Dims, Geometry, ItemId, Position, RotationMode};
use cubestack_core::{Error, PlacedItem, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cuboid item to be packed, in canonical (dialect-free) form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemSpec {
    /// Unique identifier.
    id: ItemId,

    /// Request group used for reporting.
    request_id: ItemId,

    /// Dimensions (length, width, height).
    dimensions: Dims,

    /// Whether other items may rest on top of this one.
    stackable: bool,
}

impl ItemSpec {
    /// Creates a new item. The request group defaults to the item id.
    pub fn new(id: impl Into<ItemId>, length: u32, width: u32, height: u32) -> Self {
        let id = id.into();
        Self {
            request_id: id.clone(),
            id,
            dimensions: Dims::new(length, width, height),
            stackable: true,
        }
    }

    /// Sets the request group.
    pub fn with_request_id(mut self, request_id: impl Into<ItemId>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Sets whether items can be stacked on top.
    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    /// Returns the request group.
    pub fn request_id(&self) -> &ItemId {
        &self.request_id
    }

    /// Returns the length.
    pub fn length(&self) -> u32 {
        self.dimensions.x
    }

    /// Returns the width.
    pub fn width(&self) -> u32 {
        self.dimensions.y
    }

    /// Returns the height.
    pub fn height(&self) -> u32 {
        self.dimensions.z
    }

    /// Returns whether items can be stacked on top.
    pub fn is_stackable(&self) -> bool {
        self.stackable
    }

    /// Returns dimensions for a given rotation id.
    pub fn rotated(&self, rotation_id: usize, mode: RotationMode) -> Dims {
        rotate(&self.dimensions, rotation_id, mode)
    }
}

impl Geometry for ItemSpec {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn dimensions(&self) -> &Dims {
        &self.dimensions
    }

    fn validate(&self) -> Result<()> {
        if self.dimensions.iter().any(|&d| d == 0) {
            return Err(Error::InvalidItem(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        Ok(())
    }
}

/// An axis-aligned box given by its minimum corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cuboid {
    /// Minimum corner.
    pub min: Position,
    /// Extent along each axis.
    pub size: Dims,
}

impl Cuboid {
    /// Creates a new box.
    pub fn new(min: Position, size: Dims) -> Self {
        Self { min, size }
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> Position {
        self.min + self.size
    }

    /// Checks if this box overlaps with another box.
    ///
    /// Intervals are closed-open, so boxes that only share a face do not
    /// overlap.
    pub fn overlaps(&self, other: &Cuboid) -> bool {
        let self_max = self.max();
        let other_max = other.max();

        (0..3).all(|axis| self.min[axis] < other_max[axis] && other.min[axis] < self_max[axis])
    }
}

impl From<&PlacedItem> for Cuboid {
    fn from(placed: &PlacedItem) -> Self {
        Self::new(placed.position, placed.dimensions)
    }
}

/// Returns true if two boxes overlap (touching faces do not count).
pub fn overlaps(a: &Cuboid, b: &Cuboid) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cuboid(min: (u32, u32, u32), size: (u32, u32, u32)) -> Cuboid {
        Cuboid::new(
            Position::new(min.0, min.1, min.2),
            Dims::new(size.0, size.1, size.2),
        )
    }

    #[test]
    fn test_item_volume() {
        let item = ItemSpec::new("B1", 10, 20, 30);
        assert_eq!(item.measure(), 6000);
        assert_eq!(item.request_id(), "B1");
    }

    #[test]
    fn test_item_rotation() {
        let item = ItemSpec::new("B1", 3, 8, 2);
        assert_eq!(item.rotated(1, RotationMode::LockAxis), Dims::new(8, 3, 2));
    }

    #[test]
    fn test_item_validation() {
        assert!(ItemSpec::new("B1", 10, 20, 30).validate().is_ok());
        assert!(ItemSpec::new("B2", 10, 0, 30).validate().is_err());
    }

    #[test]
    fn test_overlap() {
        let a = cuboid((0, 0, 0), (10, 10, 10));
        assert!(overlaps(&a, &cuboid((5, 5, 5), (10, 10, 10))));
        assert!(!overlaps(&a, &cuboid((15, 0, 0), (10, 10, 10))));
    }

    #[test]
    fn test_touching_faces_do_not_overlap() {
        let a = cuboid((0, 0, 0), (6, 6, 4));
        assert!(!a.overlaps(&cuboid((0, 0, 4), (6, 6, 4))));
        assert!(!a.overlaps(&cuboid((6, 0, 0), (1, 1, 1))));
        assert!(!a.overlaps(&cuboid((0, 6, 0), (1, 1, 1))));
    }

    #[test]
    fn test_overlap_requires_all_axes() {
        let a = cuboid((0, 0, 0), (4, 4, 4));
        // Overlaps on x and y but sits entirely above.
        assert!(!a.overlaps(&cuboid((1, 1, 5), (2, 2, 2))));
        // Contained box.
        assert!(a.overlaps(&cuboid((1, 1, 1), (1, 1, 1))));
    }
}
