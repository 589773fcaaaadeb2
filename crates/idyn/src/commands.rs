//! Subcommand implementations.
//!
//! Each analysis command loads its data directory, computes the curves and
//! returns an [`AnalysisReport`]; printing is left to the caller.

use anyhow::{Context, Result, bail};
use idyn_compare::divergence::divergence_curves;
use idyn_compare::mse::{mse_by_method, trajectory_overlay};
use idyn_compare::report::AnalysisReport;
use idyn_compare::timing::summarize_timings;
use idyn_core::{AnalysisConfig, SeriesStore, TimeAlignedStore, TimingSet};
use idyn_runner::{SweepOutcome, SweepPlan, divergence_plan, execute, lucky_shot_plan, method_plan};
use tracing::info;

use crate::cli::Experiment;

/// Pairwise divergence curves over the configured timestep list.
pub fn run_divergence(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let cfg = &config.divergence;
    if cfg.delta_ts.len() < 2 {
        bail!("divergence needs at least two timesteps, got {}", cfg.delta_ts.len());
    }

    let store = TimeAlignedStore::load_dir(&cfg.data_dir, cfg.ball_count)
        .with_context(|| format!("loading positional runs from {}", cfg.data_dir.display()))?;
    info!(runs = store.len(), ball_count = cfg.ball_count, "loaded positional runs");

    let curves = divergence_curves(&cfg.delta_ts, &store).context("computing divergence")?;
    Ok(AnalysisReport::new(format!("parallel universes, {} balls", cfg.ball_count))
        .with_divergence(curves))
}

/// MSE per method and timestep, plus the trajectory overlay when configured.
pub fn run_errors(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let cfg = &config.errors;
    let store = SeriesStore::load_dir(&cfg.data_dir)
        .with_context(|| format!("loading error series from {}", cfg.data_dir.display()))?;
    info!(series = store.len(), methods = store.methods().len(), "loaded error series");

    let methods: Vec<String> = cfg.methods.iter().map(ToString::to_string).collect();
    let methods: Vec<&str> = methods.iter().map(String::as_str).collect();
    let curves =
        mse_by_method(&store, &methods, cfg.order).context("computing mean squared error")?;
    let mut report = AnalysisReport::new("integration error").with_mse(curves);

    if !cfg.overlay_methods.is_empty() {
        let overlay: Vec<String> = cfg.overlay_methods.iter().map(ToString::to_string).collect();
        let overlay: Vec<&str> = overlay.iter().map(String::as_str).collect();
        let overlay = trajectory_overlay(&store, cfg.overlay_delta_t, &overlay)
            .with_context(|| format!("building trajectory overlay at dt={}", cfg.overlay_delta_t))?;
        report = report.with_overlay(overlay);
    }
    Ok(report)
}

/// Mean and standard error of the lucky-shot timings per position.
pub fn run_timings(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let cfg = &config.timings;
    let set = TimingSet::load_dir(&cfg.data_dir)
        .with_context(|| format!("loading timings from {}", cfg.data_dir.display()))?;
    info!(positions = set.len(), "loaded timing samples");

    Ok(AnalysisReport::new("lucky shot").with_timings(summarize_timings(&set, cfg.order)))
}

pub fn sweep_plan(config: &AnalysisConfig, experiment: Experiment) -> SweepPlan {
    match experiment {
        Experiment::Divergence => divergence_plan(&config.divergence, &config.simulator),
        Experiment::Methods => method_plan(&config.errors, &config.simulator),
        Experiment::LuckyShot => lucky_shot_plan(&config.timings, &config.simulator),
    }
}

/// Shell-style rendering of every command in `plan`.
pub fn describe_plan(plan: &SweepPlan) -> String {
    let mut out = String::new();
    for run in &plan.runs {
        out.push_str(&run.invocation.program().display().to_string());
        for arg in run.invocation.args() {
            out.push(' ');
            if arg.contains(char::is_whitespace) {
                out.push_str(&format!("{arg:?}"));
            } else {
                out.push_str(&arg);
            }
        }
        if let Some(results) = &run.results_file {
            out.push_str(&format!(" >> {}", results.display()));
        }
        out.push('\n');
    }
    out
}

pub fn run_sweep(config: &AnalysisConfig, experiment: Experiment) -> Result<SweepOutcome> {
    let plan = sweep_plan(config, experiment);
    execute(&plan).with_context(|| format!("running {} sweep", plan.name))
}
