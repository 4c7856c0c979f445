//! # cubestack
//!
//! Heuristic 3D bin packing of axis-aligned cuboids.
//!
//! Items are placed one at a time onto a height map of the bin floor. Every
//! placement rests on a perfectly flat surface, stays inside the bin and never
//! intersects another placement. Items that cannot be placed are reported as
//! leftovers rather than errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use cubestack::d3::{Bin, GreedyPacker, ItemSpec};
//! use cubestack::{Config, SelectionPolicy, Solver};
//!
//! let bin = Bin::new(10, 5, 10);
//! let items = vec![ItemSpec::new("A", 3, 8, 2)];
//!
//! let config = Config::default().with_policy(SelectionPolicy::FirstFit);
//! let result = GreedyPacker::new(config).solve(&items, &bin).unwrap();
//!
//! // Only the swapped footprint fits the 10 x 5 floor.
//! assert_eq!(result.placed[0].rotation, 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `d3` (default): the height-map packer
//! - `serde`: Serialization support

/// Core types, rotation model and configuration.
pub use cubestack_core as core;

/// 3D bin packing algorithms.
#[cfg(feature = "d3")]
pub use cubestack_d3 as d3;

// Re-export commonly used types at root level
pub use cubestack_core::{
    Config, Error, PackResult, Result, RotationMode, ScoreWeights, SelectionPolicy, Solver,
    Termination,
};
