//! Error types for cubestack.

use thiserror::Error;

/// Result type alias for cubestack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during packing.
///
/// Infeasible items and an exhausted time budget are *not* errors; they are
/// reported through [`PackResult`](crate::PackResult).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid item provided (non-positive dimension, empty id, ...).
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid bin provided.
    #[error("Invalid bin: {0}")]
    InvalidBin(String),

    /// Rotation id outside the range of the active rotation mode.
    #[error("Invalid rotation id {id}: mode allows {variants} variants")]
    InvalidRotation {
        /// The requested rotation id.
        id: usize,
        /// Number of variants the mode admits.
        variants: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal consistency failure. Indicates a bug in the engine.
    #[error("Internal error: {0}")]
    Internal(String),
}
