//! Request handling for the cubestack command-line tool.
//!
//! This crate provides:
//! - JSON request parsing for both item dialects
//! - The JSON response shape
//! - Single and parallel batch execution

pub mod request;
pub mod response;
pub mod runner;

pub use request::{NormalizedRequest, PackRequest, RequestError, RequestParser};
pub use response::PackResponse;
pub use runner::{run_batch, run_file, run_request, BatchOutcome, RunError, RunOverrides};
