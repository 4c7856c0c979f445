//! # cubestack 3D
//!
//! Height-map based cuboid packing for the cubestack engine.
//!
//! Items rest on a discretised floor map of the bin: every placement sits on a
//! perfectly flat surface, stays inside the bin and never intersects another
//! placement. [`GreedyPacker`] drives the search under one of two
//! [`SelectionPolicy`] variants.
//!
//! ## Quick Start
//!
//! ```rust
//! use cubestack_d3::{Bin, Config, GreedyPacker, ItemSpec, Solver};
//!
//! let items = vec![ItemSpec::new("A", 6, 6, 4), ItemSpec::new("B", 6, 6, 4)];
//! let bin = Bin::new(6, 6, 10);
//!
//! let result = GreedyPacker::new(Config::default()).solve(&items, &bin).unwrap();
//! assert_eq!(result.placed.len(), 2);
//! assert_eq!(result.placed[1].z(), 4);
//! ```

pub mod boundary;
pub mod candidates;
pub mod constraints;
pub mod geometry;
pub mod height_map;
pub mod packer;
pub mod packing_utils;
pub mod recorder;
pub mod scoring;

// Re-exports
pub use boundary::{Bin, MAX_FLOOR_CELLS};
pub use candidates::{Candidate, CandidateGenerator};
pub use constraints::{ConstraintChecker, Violation};
pub use geometry::{overlaps, Cuboid, ItemSpec};
pub use height_map::HeightMap;
pub use packer::GreedyPacker;
pub use packing_utils::verify_packing;
pub use recorder::StepRecorder;
pub use scoring::PlacementScorer;
pub use cubestack_core::{
    Boundary, Config, Dims, Error, Geometry, LeftoverItem, PackObserver, PackResult, PackingStep,
    PlacedItem, Position, Result, RotationMode, ScoreWeights, SelectionPolicy, Solver, Termination,
};
