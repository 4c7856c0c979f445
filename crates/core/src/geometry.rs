//! Core geometry traits, dimensions and the rotation model.

use crate::{Error, Result};
use nalgebra::Vector3;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for an item.
pub type ItemId = String;

/// Integer box dimensions as (length, width, height).
pub type Dims = Vector3<u32>;

/// Integer position of a box's minimum corner as (x, y, z).
pub type Position = Vector3<u32>;

/// Axis permutations for lock-axis mode: height stays vertical.
const LOCK_AXIS_PERMUTATIONS: [(usize, usize, usize); 2] = [
    (0, 1, 2), // (l, w, h)
    (1, 0, 2), // (w, l, h)
];

/// Axis permutations for free mode: every ordering of (l, w, h).
const FREE_PERMUTATIONS: [(usize, usize, usize); 6] = [
    (0, 1, 2), // (l, w, h)
    (1, 0, 2), // (w, l, h)
    (0, 2, 1), // (l, h, w)
    (1, 2, 0), // (w, h, l)
    (2, 1, 0), // (h, w, l)
    (2, 0, 1), // (h, l, w)
];

/// Run-wide orientation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RotationMode {
    /// Only length and width may swap; height is fixed (2 variants).
    #[default]
    LockAxis,
    /// All six permutations of the three dimensions are legal.
    Free,
}

impl RotationMode {
    /// Builds the mode from the `lock_axis` flag used by request payloads.
    pub fn from_lock_axis(lock_axis: bool) -> Self {
        if lock_axis {
            Self::LockAxis
        } else {
            Self::Free
        }
    }

    fn permutations(self) -> &'static [(usize, usize, usize)] {
        match self {
            Self::LockAxis => &LOCK_AXIS_PERMUTATIONS,
            Self::Free => &FREE_PERMUTATIONS,
        }
    }

    /// Returns the number of rotation variants this mode admits.
    pub fn variant_count(self) -> usize {
        self.permutations().len()
    }

    /// Returns the valid rotation id range. Engine loops iterate this and
    /// nothing else.
    pub fn rotation_ids(self) -> Range<usize> {
        0..self.variant_count()
    }
}

/// Returns `dims` reoriented by `rotation_id`.
///
/// # Panics
///
/// Panics if `rotation_id` is outside [`RotationMode::rotation_ids`]. Use
/// [`checked_rotate`] for ids that come from outside the engine.
pub fn rotate(dims: &Dims, rotation_id: usize, mode: RotationMode) -> Dims {
    let table = mode.permutations();
    assert!(
        rotation_id < table.len(),
        "rotation id {} out of range for {:?} ({} variants)",
        rotation_id,
        mode,
        table.len()
    );
    let (a, b, c) = table[rotation_id];
    Dims::new(dims[a], dims[b], dims[c])
}

/// Fallible variant of [`rotate`].
pub fn checked_rotate(dims: &Dims, rotation_id: usize, mode: RotationMode) -> Result<Dims> {
    let variants = mode.variant_count();
    if rotation_id >= variants {
        return Err(Error::InvalidRotation {
            id: rotation_id,
            variants,
        });
    }
    Ok(rotate(dims, rotation_id, mode))
}

/// Volume of a box in u64, saturating at `u64::MAX`.
pub fn volume_of(dims: &Dims) -> u64 {
    (u64::from(dims.x) * u64::from(dims.y)).saturating_mul(u64::from(dims.z))
}

/// Trait for items that can be packed.
pub trait Geometry: Clone + Send + Sync {
    /// Returns the unique identifier of this item.
    fn id(&self) -> &ItemId;

    /// Returns the original (unrotated) dimensions.
    fn dimensions(&self) -> &Dims;

    /// Returns the volume.
    fn measure(&self) -> u64 {
        volume_of(self.dimensions())
    }

    /// Validates the item and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// Trait for containers items are packed into.
pub trait Boundary: Clone + Send + Sync {
    /// Returns the container dimensions.
    fn dimensions(&self) -> &Dims;

    /// Returns the volume.
    fn measure(&self) -> u64 {
        volume_of(self.dimensions())
    }

    /// Validates the boundary and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_axis_rotations() {
        let dims = Dims::new(3, 8, 2);
        assert_eq!(rotate(&dims, 0, RotationMode::LockAxis), Dims::new(3, 8, 2));
        assert_eq!(rotate(&dims, 1, RotationMode::LockAxis), Dims::new(8, 3, 2));
        assert_eq!(RotationMode::LockAxis.variant_count(), 2);
    }

    #[test]
    fn test_free_rotations_cover_all_orderings() {
        let dims = Dims::new(1, 2, 3);
        let mut seen: Vec<Dims> = RotationMode::Free
            .rotation_ids()
            .map(|r| rotate(&dims, r, RotationMode::Free))
            .collect();
        assert_eq!(seen[1], Dims::new(2, 1, 3));
        assert_eq!(seen[4], Dims::new(3, 2, 1));

        seen.sort_by_key(|d| (d.x, d.y, d.z));
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_rotation_preserves_volume() {
        let dims = Dims::new(4, 5, 6);
        for r in RotationMode::Free.rotation_ids() {
            assert_eq!(volume_of(&rotate(&dims, r, RotationMode::Free)), 120);
        }
    }

    #[test]
    fn test_volume_saturates() {
        let max = Dims::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(volume_of(&max), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_rotate_rejects_out_of_range_id() {
        rotate(&Dims::new(1, 2, 3), 2, RotationMode::LockAxis);
    }

    #[test]
    fn test_checked_rotate() {
        let dims = Dims::new(1, 2, 3);
        assert!(checked_rotate(&dims, 5, RotationMode::Free).is_ok());
        match checked_rotate(&dims, 6, RotationMode::Free) {
            Err(Error::InvalidRotation { id, variants }) => {
                assert_eq!(id, 6);
                assert_eq!(variants, 6);
            }
            other => panic!("expected InvalidRotation, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lock_axis() {
        assert_eq!(RotationMode::from_lock_axis(true), RotationMode::LockAxis);
        assert_eq!(RotationMode::from_lock_axis(false), RotationMode::Free);
    }
}
