//! # cubestack core
//!
//! Core types and abstractions for the cubestack 3D packing engine.
//!
//! This crate provides the types shared between the packing engine
//! (`cubestack-d3`) and its callers.
//!
//! ## Core Components
//!
//! - **Rotation model**: [`RotationMode`], [`rotate`], [`checked_rotate`]
//! - **Geometry traits**: [`Geometry`], [`Boundary`]
//! - **Solver trait**: [`Solver`] with [`PackObserver`] for step capture
//! - **Configuration**: [`Config`], [`SelectionPolicy`], [`ScoreWeights`]
//! - **Results**: [`PackResult`], [`PlacedItem`], [`LeftoverItem`]
//!
//! ## Configuration
//!
//! ```rust
//! use cubestack_core::{Config, RotationMode, SelectionPolicy};
//!
//! let config = Config::new()
//!     .with_policy(SelectionPolicy::FirstFit)
//!     .with_rotation_mode(RotationMode::Free)
//!     .with_time_limit(5_000);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{
    checked_rotate, rotate, volume_of, Boundary, Dims, Geometry, ItemId, Position, RotationMode,
};
pub use placement::{LeftoverItem, PackingStep, PlacedItem};
pub use result::{PackResult, Termination};
pub use solver::{Config, PackObserver, ScoreWeights, SelectionPolicy, Solver};
