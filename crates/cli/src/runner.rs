//! Request execution, single and batched.

use crate::request::{NormalizedRequest, RequestError, RequestParser};
use crate::response::PackResponse;
use cubestack_core::{Config, RotationMode, SelectionPolicy, Solver};
use cubestack_d3::GreedyPacker;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from running a request end to end.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Packing failed: {0}")]
    Engine(#[from] cubestack_core::Error),
}

/// Command-line overrides applied on top of a request's own settings.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub policy: Option<SelectionPolicy>,
    pub free_rotation: bool,
    pub time_limit_ms: Option<u64>,
    pub no_time_limit: bool,
    pub record_steps: bool,
}

impl RunOverrides {
    /// Applies the overrides to `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        if self.free_rotation {
            config = config.with_rotation_mode(RotationMode::Free);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(ms);
        }
        if self.no_time_limit {
            config = config.without_time_limit();
        }
        if self.record_steps {
            config = config.with_step_recording(true);
        }
        config
    }
}

/// Packs a normalised request and builds its response.
pub fn run_request(request: &NormalizedRequest) -> Result<PackResponse, RunError> {
    let packer = GreedyPacker::new(request.config.clone());
    let result = packer.solve(&request.items, &request.bin)?;
    Ok(PackResponse::from_result(&request.bin, &result))
}

/// Loads, overrides and packs one request file.
pub fn run_file(path: &Path, overrides: &RunOverrides) -> Result<PackResponse, RunError> {
    let mut request = RequestParser::new().load_file(path)?;
    request.config = overrides.apply(request.config);
    log::info!(
        "{}: {} items into {}x{}x{} bin",
        path.display(),
        request.items.len(),
        request.bin.length(),
        request.bin.width(),
        request.bin.height()
    );
    run_request(&request)
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub outcome: Result<PackResponse, RunError>,
}

impl BatchOutcome {
    /// Returns the response to hand back for this file, a failure response
    /// carrying the error message if the run failed.
    pub fn response(&self) -> PackResponse {
        match &self.outcome {
            Ok(response) => response.clone(),
            Err(e) => PackResponse::failure(e.to_string()),
        }
    }
}

/// Packs several request files in parallel.
///
/// Runs share nothing; outcomes come back in input order.
pub fn run_batch(paths: &[PathBuf], overrides: &RunOverrides) -> Vec<BatchOutcome> {
    paths
        .par_iter()
        .map(|path| BatchOutcome {
            path: path.clone(),
            outcome: run_file(path, overrides),
        })
        .collect()
}
