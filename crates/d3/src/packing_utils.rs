//! Shared helpers for assembling and auditing packing results.
//!
//! - [`build_leftover_list`]: unplaced items in input order
//! - [`verify_packing`]: independent audit of a finished layout

use crate::boundary::Bin;
use crate::geometry::{Cuboid, ItemSpec};
use crate::height_map::HeightMap;
use cubestack_core::geometry::{Boundary, Geometry};
use cubestack_core::{Error, LeftoverItem, PlacedItem, Result};

/// Builds the leftover list from a per-item placed flag.
///
/// Order follows the input slice.
pub fn build_leftover_list(items: &[ItemSpec], placed: &[bool]) -> Vec<LeftoverItem> {
    items
        .iter()
        .zip(placed)
        .filter(|&(_, &is_placed)| !is_placed)
        .map(|(item, _)| LeftoverItem {
            id: item.id().clone(),
            request_id: item.request_id().clone(),
            dimensions: *item.dimensions(),
        })
        .collect()
}

/// Checks a finished layout against the packing invariants.
///
/// Placements are replayed in commit order: each must lie inside the bin,
/// rest on a flat surface of the map built from its predecessors, not rest on
/// a non-stackable item, and not intersect any other placement.
pub fn verify_packing(bin: &Bin, placed: &[PlacedItem]) -> Result<()> {
    bin.validate()?;
    let mut map = HeightMap::for_bin(bin);

    for (index, item) in placed.iter().enumerate() {
        if !bin.contains_box(&item.position, &item.dimensions) {
            return Err(Error::Internal(format!(
                "'{}' extends outside the bin",
                item.id
            )));
        }

        let (x, y) = (item.x(), item.y());
        let (l, w) = (item.dimensions.x, item.dimensions.y);
        if map.flat_surface(x, y, l, w) != Some(item.z()) {
            return Err(Error::Internal(format!(
                "'{}' is not resting on a flat surface at z = {}",
                item.id,
                item.z()
            )));
        }
        if let Some(owner) = map
            .owners_under(x, y, l, w)
            .into_iter()
            .find(|&owner| !placed[owner].stackable)
        {
            return Err(Error::Internal(format!(
                "'{}' rests on non-stackable '{}'",
                item.id, placed[owner].id
            )));
        }

        let cuboid = Cuboid::from(item);
        if let Some(other) = placed[..index]
            .iter()
            .find(|other| cuboid.overlaps(&Cuboid::from(*other)))
        {
            return Err(Error::Internal(format!(
                "'{}' overlaps '{}'",
                item.id, other.id
            )));
        }

        map.commit(item, index);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubestack_core::{Dims, Position};

    fn placed(id: &str, pos: (u32, u32, u32), dims: (u32, u32, u32)) -> PlacedItem {
        let dims = Dims::new(dims.0, dims.1, dims.2);
        PlacedItem {
            id: id.into(),
            request_id: id.into(),
            position: Position::new(pos.0, pos.1, pos.2),
            rotation: 0,
            dimensions: dims,
            original_dimensions: dims,
            stackable: true,
        }
    }

    #[test]
    fn test_build_leftover_list_keeps_input_order() {
        let items = vec![
            ItemSpec::new("A", 1, 1, 1),
            ItemSpec::new("B", 2, 2, 2).with_request_id("R"),
            ItemSpec::new("C", 3, 3, 3),
        ];
        let leftover = build_leftover_list(&items, &[false, true, false]);

        let ids: Vec<&str> = leftover.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(leftover[1].dimensions, Dims::new(3, 3, 3));
    }

    #[test]
    fn test_verify_accepts_valid_stack() {
        let bin = Bin::new(6, 6, 10);
        let layout = vec![
            placed("A", (0, 0, 0), (6, 6, 4)),
            placed("B", (0, 0, 4), (6, 6, 4)),
        ];
        assert!(verify_packing(&bin, &layout).is_ok());
    }

    #[test]
    fn test_verify_rejects_violations() {
        let bin = Bin::new(10, 10, 10);

        let floating = vec![placed("A", (0, 0, 3), (2, 2, 2))];
        assert!(verify_packing(&bin, &floating).is_err());

        let outside = vec![placed("A", (8, 0, 0), (4, 2, 2))];
        assert!(verify_packing(&bin, &outside).is_err());

        let overhang = vec![
            placed("A", (0, 0, 0), (4, 4, 2)),
            placed("B", (2, 0, 2), (4, 4, 2)),
        ];
        assert!(verify_packing(&bin, &overhang).is_err());

        let mut fragile = placed("A", (0, 0, 0), (4, 4, 2));
        fragile.stackable = false;
        let loaded = vec![fragile, placed("B", (0, 0, 2), (2, 2, 2))];
        assert!(verify_packing(&bin, &loaded).is_err());

        let far = vec![placed("A", (u32::MAX, 0, 0), (2, 2, 2))];
        assert!(verify_packing(&bin, &far).is_err());
    }
}
