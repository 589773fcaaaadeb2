//! Sweep plans: the experiments expanded into concrete simulator runs.

use std::path::PathBuf;

use idyn_core::config::{DivergenceConfig, ErrorConfig, SimulatorConfig, TimingConfig};
use idyn_core::Method;

use crate::invocation::SimulatorInvocation;

/// One simulator run and, for benchmarks, where its elapsed time goes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRun {
    pub label: String,
    pub invocation: SimulatorInvocation,
    /// Benchmark results file; `None` for runs that only write a dump
    pub results_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    pub name: String,
    pub output_dir: PathBuf,
    pub runs: Vec<PlannedRun>,
}

impl SweepPlan {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Billiards with fixed spacing and no holes, once per timestep.
pub fn divergence_plan(config: &DivergenceConfig, simulator: &SimulatorConfig) -> SweepPlan {
    let runs = config
        .delta_ts
        .iter()
        .map(|&delta_t| PlannedRun {
            label: format!("delta_t={delta_t}"),
            invocation: SimulatorInvocation::new(&simulator.billiards, config.method.to_string())
                .fixed_spacing(true)
                .ignore_holes(true)
                .data_output_path(config.data_dir.join(format!("{delta_t}.txt")))
                .simulation_delta_t(delta_t)
                .output_delta_t(config.output_delta_t)
                .max_time(config.max_time),
            results_file: None,
        })
        .collect();

    SweepPlan {
        name: "divergence".to_string(),
        output_dir: config.data_dir.clone(),
        runs,
    }
}

/// Oscillator once per method and timestep, sampled at every step.
pub fn method_plan(config: &ErrorConfig, simulator: &SimulatorConfig) -> SweepPlan {
    let runs = config
        .methods
        .iter()
        .flat_map(|method: &Method| {
            config.delta_ts.iter().map(move |&delta_t| PlannedRun {
                label: format!("{method} delta_t={delta_t}"),
                invocation: SimulatorInvocation::new(&simulator.oscillator, method.to_string())
                    .data_output_path(
                        config
                            .data_dir
                            .join(method.to_string())
                            .join(format!("{delta_t}.txt")),
                    )
                    .simulation_delta_t(delta_t)
                    .output_delta_t(delta_t),
                results_file: None,
            })
        })
        .collect();

    SweepPlan {
        name: "methods".to_string(),
        output_dir: config.data_dir.clone(),
        runs,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `(y, offset)` pairs of the lucky-shot sweep, both rounded to 3 decimals.
///
/// `y` steps from `y_min` up to but excluding `y_max`; the offset is measured
/// from `y_max`. A non-positive step yields no positions.
pub fn lucky_shot_positions(config: &TimingConfig) -> Vec<(f64, f64)> {
    if config.y_step.is_nan() || config.y_step <= 0.0 || config.y_max <= config.y_min {
        return Vec::new();
    }
    // the tolerance keeps float noise in the span from adding a y_max sample
    let count = ((config.y_max - config.y_min) / config.y_step - 1e-9).ceil() as usize;
    (0..count)
        .map(|i| {
            let y = config.y_min + i as f64 * config.y_step;
            (round3(y), round3(config.y_max - y))
        })
        .collect()
}

/// Billiards runs that stop after `balls_to_wait_for` pocketed balls,
/// `runs_per_position` times for each white ball position.
pub fn lucky_shot_plan(config: &TimingConfig, simulator: &SimulatorConfig) -> SweepPlan {
    let method = config.method;
    let runs = lucky_shot_positions(config)
        .into_iter()
        .flat_map(|(y, offset)| {
            let results_file = config.data_dir.join(format!("{y}.txt"));
            (0..config.runs_per_position).map(move |run| PlannedRun {
                label: format!("y={y} run {}", run + 1),
                invocation: SimulatorInvocation::new(&simulator.billiards, method.to_string())
                    .white_offset(offset)
                    .simulation_delta_t(config.delta_t)
                    .output_delta_t(config.output_delta_t)
                    .ball_count_stop(config.balls_to_wait_for),
                results_file: Some(results_file.clone()),
            })
        })
        .collect();

    SweepPlan {
        name: "lucky-shot".to_string(),
        output_dir: config.data_dir.clone(),
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divergence_plan_matches_timesteps() {
        let config = DivergenceConfig::default();
        let plan = divergence_plan(&config, &SimulatorConfig::default());
        assert_eq!(plan.len(), 5);
        assert!(plan.runs.iter().all(|r| r.results_file.is_none()));

        let args = plan.runs[1].invocation.args();
        assert_eq!(args[0], "gear-predictor-corrector");
        assert!(args.contains(&"-f".to_string()));
        assert!(args.contains(&"-i".to_string()));
        assert!(args.contains(&"-m100".to_string()));
        assert_eq!(
            plan.runs[1].invocation.output_path(),
            Some(config.data_dir.join("0.001.txt").as_path())
        );
    }

    #[test]
    fn test_method_plan_covers_every_pair() {
        let config = ErrorConfig {
            methods: vec![Method::Euler, Method::Beeman],
            delta_ts: vec![0.01, 0.001],
            ..ErrorConfig::default()
        };
        let plan = method_plan(&config, &SimulatorConfig::default());
        assert_eq!(plan.len(), 4);

        let last = &plan.runs[3].invocation;
        assert_eq!(
            last.output_path(),
            Some(config.data_dir.join("beeman").join("0.001.txt").as_path())
        );
        let args = last.args();
        assert_eq!(&args[args.len() - 2..], &["--output-delta-t", "0.001"]);
    }

    #[test]
    fn test_lucky_shot_positions_exclude_upper_bound() {
        let positions = lucky_shot_positions(&TimingConfig::default());
        assert_eq!(positions.len(), 20);
        assert_eq!(positions[0], (0.42, 0.14));
        assert_eq!(positions[1], (0.427, 0.133));
        assert_eq!(positions[19], (0.553, 0.007));
    }

    #[test]
    fn test_lucky_shot_positions_degenerate_step() {
        let config = TimingConfig {
            y_step: 0.0,
            ..TimingConfig::default()
        };
        assert!(lucky_shot_positions(&config).is_empty());
    }

    #[test]
    fn test_lucky_shot_plan_repeats_each_position() {
        let config = TimingConfig {
            runs_per_position: 3,
            ..TimingConfig::default()
        };
        let plan = lucky_shot_plan(&config, &SimulatorConfig::default());
        assert_eq!(plan.len(), 20 * 3);

        let first = &plan.runs[0];
        assert_eq!(first.results_file, Some(config.data_dir.join("0.42.txt")));
        assert_eq!(first.invocation.args()[0], "gear-predictor-corrector");
        assert_eq!(first.invocation.args()[1], "-w0.14");
        assert_eq!(first.invocation.output_path(), None);
        assert_eq!(plan.runs[2].results_file, first.results_file);
        assert_eq!(plan.runs[3].results_file, Some(config.data_dir.join("0.427.txt")));
    }
}
