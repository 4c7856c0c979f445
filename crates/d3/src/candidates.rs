//! Candidate anchor positions.
//!
//! Anchors are floor cells where a new item could start so that it touches an
//! already placed item. The origin is always proposed; every placed item then
//! contributes the cells just past its footprint:
//!
//! ```text
//!   y
//!   ^
//!   | (x, y+w) ---- (x+l, y+w)
//!   |    |  placed   |
//!   | (x, y) ------ (x+l, y)
//!   +-----------------------> x
//! ```
//!
//! The z of an anchor is never chosen freely: it is read from the height map,
//! so two anchors on the same cell are the same candidate.

use crate::boundary::Bin;
use crate::height_map::HeightMap;
use cubestack_core::solver::DEFAULT_MAX_CANDIDATES;
use cubestack_core::PlacedItem;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A proposed anchor (x, y) with its derived resting height z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// X coordinate.
    pub x: u32,
    /// Y coordinate.
    pub y: u32,
    /// Surface height at (x, y).
    pub z: u32,
}

impl Candidate {
    /// Creates a new candidate.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Bottom-left-front first: lower z, then lower y, then lower x.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.z, self.y, self.x).cmp(&(other.z, other.y, other.x))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Proposes a bounded, deterministically ordered set of anchors.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator {
    max_candidates: usize,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl CandidateGenerator {
    /// Creates a generator keeping at most `max_candidates` anchors.
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }

    /// Returns the cap on anchors per round.
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Returns the right, behind and diagonal anchors of a placed item.
    pub fn anchors_of(placed: &PlacedItem) -> [(u32, u32); 3] {
        let (x, y) = (placed.x(), placed.y());
        let (l, w) = (placed.dimensions.x, placed.dimensions.y);
        [(x + l, y), (x, y + w), (x + l, y + w)]
    }

    /// Generates candidates for the current state.
    ///
    /// The result is sorted by (z, y, x) and truncated to the cap, so identical
    /// states always yield identical candidate lists.
    pub fn generate(&self, bin: &Bin, height_map: &HeightMap, placed: &[PlacedItem]) -> Vec<Candidate> {
        let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(1 + placed.len() * 3);
        let mut candidates = Vec::with_capacity(1 + placed.len() * 3);

        let anchors = std::iter::once((0, 0)).chain(placed.iter().flat_map(Self::anchors_of));
        for (x, y) in anchors {
            if !bin.contains_cell(x, y) || !seen.insert((x, y)) {
                continue;
            }
            candidates.push(Candidate::new(x, y, height_map.height_at(x, y)));
        }

        candidates.sort_unstable();
        candidates.truncate(self.max_candidates);
        candidates
    }
}
