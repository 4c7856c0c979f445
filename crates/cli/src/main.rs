//! cubestack CLI
//!
//! Usage:
//!   cubestack pack <request.json> [-o <response.json>] [--policy first-fit] [--free-rotation]
//!   cubestack validate <request.json>
//!   cubestack batch <a.json> <b.json> ... [--output-dir <DIR>]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cubestack_cli::{run_batch, run_file, RequestParser, RunOverrides};
use cubestack_core::SelectionPolicy;
use log::{info, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};

/// Heuristic 3D bin packing
#[derive(Parser, Debug)]
#[command(name = "cubestack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a single request file
    Pack {
        /// Request file (JSON)
        #[arg(value_name = "REQUEST")]
        file: PathBuf,

        /// Response file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Check a request file without packing it
    Validate {
        /// Request file (JSON)
        #[arg(value_name = "REQUEST")]
        file: PathBuf,
    },

    /// Pack several request files in parallel
    Batch {
        /// Request files (JSON)
        #[arg(value_name = "REQUEST", required = true)]
        files: Vec<PathBuf>,

        /// Directory for per-request responses
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Args, Debug)]
struct OverrideArgs {
    /// Selection policy (overrides the request)
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,

    /// Allow all six orientations
    #[arg(long)]
    free_rotation: bool,

    /// Time limit in milliseconds
    #[arg(short, long, value_name = "MS")]
    time_limit: Option<u64>,

    /// Run without a time limit
    #[arg(long, conflicts_with = "time_limit")]
    no_time_limit: bool,

    /// Include the step log in the response
    #[arg(long)]
    steps: bool,
}

impl From<OverrideArgs> for RunOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            policy: args.policy.map(Into::into),
            free_rotation: args.free_rotation,
            time_limit_ms: args.time_limit,
            no_time_limit: args.no_time_limit,
            record_steps: args.steps,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Commit the best-scoring placement each round
    BestOfAll,
    /// Place items in input order at their first legal position
    FirstFit,
}

impl From<PolicyArg> for SelectionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::BestOfAll => SelectionPolicy::BestOfAll,
            PolicyArg::FirstFit => SelectionPolicy::FirstFit,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Pack {
            file,
            output,
            overrides,
        } => cmd_pack(&file, output.as_deref(), overrides.into()),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Batch {
            files,
            output_dir,
            overrides,
        } => cmd_batch(&files, output_dir.as_deref(), overrides.into()),
    }
}

fn cmd_pack(file: &Path, output: Option<&Path>, overrides: RunOverrides) -> Result<()> {
    let response = run_file(file, &overrides)
        .with_context(|| format!("Failed to pack {}", file.display()))?;
    let json = serde_json::to_string_pretty(&response)?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Response saved to: {}", path.display());
            println!("{}", response.message);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_validate(file: &Path) -> Result<()> {
    let request = RequestParser::new()
        .load_file(file)
        .with_context(|| format!("Invalid request {}", file.display()))?;

    println!("Request is valid: {}", file.display());
    println!(
        "  Bin: {} x {} x {}",
        request.bin.length(),
        request.bin.width(),
        request.bin.height()
    );
    println!("  Items: {}", request.items.len());
    println!("  Policy: {}", request.config.policy.name());
    println!("  Rotation: {:?}", request.config.rotation_mode);

    Ok(())
}

fn cmd_batch(files: &[PathBuf], output_dir: Option<&Path>, overrides: RunOverrides) -> Result<()> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let outcomes = run_batch(files, &overrides);

    if let Some(dir) = output_dir {
        for outcome in &outcomes {
            let stem = outcome
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "request".to_string());
            let path = dir.join(format!("{}.response.json", stem));
            fs::write(&path, serde_json::to_string_pretty(&outcome.response())?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    let mut failures = 0;
    println!("{:<40} {:>8} {:>8} {:>8} {:>10}", "request", "placed", "left", "util", "time");
    println!("{:-<78}", "");
    for outcome in &outcomes {
        let name = outcome.path.display().to_string();
        match &outcome.outcome {
            Ok(response) => {
                println!(
                    "{:<40} {:>8} {:>8} {:>7.1}% {:>9.3}s{}",
                    name,
                    response.packed_items.len(),
                    response.leftover_items.len(),
                    response.utilization * 100.0,
                    response.packing_time,
                    if response.stopped_early { " *" } else { "" }
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:<40} error: {}", name, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} requests failed", failures, outcomes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pack_arguments() {
        let cli = Cli::try_parse_from([
            "cubestack",
            "-v",
            "pack",
            "req.json",
            "--policy",
            "first-fit",
            "--free-rotation",
            "-t",
            "500",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Pack { file, overrides, .. } => {
                assert_eq!(file, PathBuf::from("req.json"));
                let overrides = RunOverrides::from(overrides);
                assert_eq!(overrides.policy, Some(SelectionPolicy::FirstFit));
                assert!(overrides.free_rotation);
                assert_eq!(overrides.time_limit_ms, Some(500));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_time_limit_flags_conflict() {
        assert!(Cli::try_parse_from([
            "cubestack",
            "batch",
            "a.json",
            "--time-limit",
            "5",
            "--no-time-limit"
        ])
        .is_err());
    }
}
