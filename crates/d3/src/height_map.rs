//! Top-surface height map of the bin floor.
//!
//! The map stores, for every unit cell of the floor, the height of the highest
//! surface covering it and which placement owns that surface. It is a cache
//! over the placed set: [`HeightMap::rebuild`] reconstructs it from scratch and
//! must always agree with the incrementally maintained copy.

use crate::boundary::Bin;
use cubestack_core::PlacedItem;

/// Per-cell top surface heights over a `length x width` floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightMap {
    length: u32,
    width: u32,
    /// Row-major by x: cell (x, y) lives at `x * width + y`.
    heights: Vec<u32>,
    /// Index into the placed list of the item whose top face is exposed.
    owners: Vec<Option<usize>>,
}

impl HeightMap {
    /// Creates a flat map at height 0.
    pub fn new(length: u32, width: u32) -> Self {
        let cells = length as usize * width as usize;
        Self {
            length,
            width,
            heights: vec![0; cells],
            owners: vec![None; cells],
        }
    }

    /// Creates an empty map covering the floor of `bin`.
    pub fn for_bin(bin: &Bin) -> Self {
        Self::new(bin.length(), bin.width())
    }

    /// Rebuilds a map from scratch by replaying `placed` in commit order.
    pub fn rebuild(length: u32, width: u32, placed: &[PlacedItem]) -> Self {
        let mut map = Self::new(length, width);
        for (idx, item) in placed.iter().enumerate() {
            map.commit(item, idx);
        }
        map
    }

    /// Returns the floor length.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns the floor width.
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.length && y < self.width, "cell ({x}, {y}) off map");
        x as usize * self.width as usize + y as usize
    }

    /// Returns the top surface height at cell (x, y).
    pub fn height_at(&self, x: u32, y: u32) -> u32 {
        self.heights[self.index(x, y)]
    }

    /// Writes the top face of `item` into every cell of its footprint.
    ///
    /// `index` is the item's position in the placed list.
    pub fn commit(&mut self, item: &PlacedItem, index: usize) {
        let top = item.top();
        let (x0, y0) = (item.x(), item.y());
        let (l, w) = (item.dimensions.x, item.dimensions.y);
        debug_assert!(x0 + l <= self.length && y0 + w <= self.width);

        for x in x0..x0 + l {
            let start = self.index(x, y0);
            let end = start + w as usize;
            self.heights[start..end].fill(top);
            self.owners[start..end].fill(Some(index));
        }
    }

    /// Cell indices under the footprint `l x w` anchored at (x, y).
    fn footprint_cells(&self, x: u32, y: u32, l: u32, w: u32) -> impl Iterator<Item = usize> + '_ {
        (x..x + l).flat_map(move |row| {
            let start = self.index(row, y);
            start..start + w as usize
        })
    }

    /// Returns the support height if every cell under the footprint has the
    /// same height, `None` if the surface is uneven.
    ///
    /// The footprint must lie inside the map.
    pub fn flat_surface(&self, x: u32, y: u32, l: u32, w: u32) -> Option<u32> {
        let base = self.height_at(x, y);
        self.footprint_cells(x, y, l, w)
            .all(|i| self.heights[i] == base)
            .then_some(base)
    }

    /// Returns every distinct owner exposed under the footprint.
    pub fn owners_under(&self, x: u32, y: u32, l: u32, w: u32) -> Vec<usize> {
        let mut owners: Vec<usize> = self
            .footprint_cells(x, y, l, w)
            .filter_map(|i| self.owners[i])
            .collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }
}
