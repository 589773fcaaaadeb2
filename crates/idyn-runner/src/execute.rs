//! Sequential sweep execution.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use tracing::{debug, info};

use crate::error::RunError;
use crate::sweep::{PlannedRun, SweepPlan};

/// What a finished sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepOutcome {
    pub runs: usize,
    /// Elapsed-time samples appended to results files
    pub samples: usize,
}

fn elapsed_token(stdout: &str) -> Result<&str, RunError> {
    stdout
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| RunError::MissingElapsed {
            stdout: stdout.to_string(),
        })
}

/// Elapsed simulated time reported by a benchmark run: the third token of
/// its standard output.
pub fn parse_elapsed(stdout: &str) -> Result<f64, RunError> {
    let token = elapsed_token(stdout)?;
    token.parse().map_err(|_| RunError::InvalidElapsed {
        token: token.to_string(),
    })
}

fn create_dir(dir: &Path) -> Result<(), RunError> {
    fs::create_dir_all(dir).map_err(|e| RunError::io(dir, e))
}

fn append_line(path: &Path, line: &str) -> Result<(), RunError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RunError::io(path, e))?;
    writeln!(file, "{line}").map_err(|e| RunError::io(path, e))
}

/// Run every invocation of `plan` in order, stopping at the first failure.
pub fn execute(plan: &SweepPlan) -> Result<SweepOutcome, RunError> {
    create_dir(&plan.output_dir)?;
    info!(sweep = %plan.name, runs = plan.len(), "starting sweep");

    let mut outcome = SweepOutcome::default();
    for (idx, run) in plan.runs.iter().enumerate() {
        info!(
            sweep = %plan.name,
            step = idx + 1,
            total = plan.len(),
            run = %run.label,
            "running simulator"
        );
        if run_one(run)? {
            outcome.samples += 1;
        }
        outcome.runs += 1;
    }

    info!(sweep = %plan.name, runs = outcome.runs, samples = outcome.samples, "sweep finished");
    Ok(outcome)
}

/// Returns whether an elapsed-time sample was recorded.
fn run_one(run: &PlannedRun) -> Result<bool, RunError> {
    let invocation = &run.invocation;
    if let Some(parent) = invocation.output_path().and_then(Path::parent) {
        create_dir(parent)?;
    }
    let spawn_error = |source| RunError::Spawn {
        program: invocation.program().to_path_buf(),
        source,
    };

    let Some(results_file) = &run.results_file else {
        let status = invocation.to_command().status().map_err(spawn_error)?;
        if !status.success() {
            return Err(RunError::ExitStatus {
                program: invocation.program().to_path_buf(),
                status,
            });
        }
        return Ok(false);
    };

    let output = invocation
        .to_command()
        .stderr(Stdio::inherit())
        .output()
        .map_err(spawn_error)?;
    if !output.status.success() {
        return Err(RunError::ExitStatus {
            program: invocation.program().to_path_buf(),
            status: output.status,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let token = elapsed_token(&stdout)?;
    let elapsed = parse_elapsed(&stdout)?;
    if let Some(parent) = results_file.parent() {
        create_dir(parent)?;
    }
    append_line(results_file, token)?;
    debug!(elapsed, file = %results_file.display(), "recorded benchmark sample");
    Ok(true)
}
