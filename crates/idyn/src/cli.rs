//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use idyn_core::{AnalysisConfig, Method, SortOrder};

/// Trajectory divergence and integration-error analysis
#[derive(Parser, Debug)]
#[command(name = "idyn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file; defaults are used when it does not exist
    #[arg(short, long, global = true, default_value = "idyn.toml")]
    pub config: PathBuf,

    /// Output format for analysis reports
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty JSON for the chart renderer
    Json,
    /// Human-readable text
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Ascending,
    Descending,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Ascending => SortOrder::Ascending,
            OrderArg::Descending => SortOrder::Descending,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Divergence between billiards runs that differ only in timestep
    Divergence(DivergenceArgs),
    /// Integration error of the oscillator methods against the analytic solution
    Errors(ErrorArgs),
    /// Lucky-shot timing statistics per white ball position
    Timings(TimingArgs),
    /// Run the simulators to produce an experiment's data files
    Sweep(SweepArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug, Default)]
pub struct DivergenceArgs {
    /// Directory holding `<delta_t>.txt` positional dumps
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Bodies per snapshot
    #[arg(short, long)]
    pub ball_count: Option<usize>,

    /// Timesteps compared pairwise, in order
    #[arg(short = 't', long = "delta-t", value_delimiter = ',')]
    pub delta_ts: Vec<f64>,
}

impl DivergenceArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(dir) = &self.data_dir {
            config.divergence.data_dir = dir.clone();
        }
        if let Some(count) = self.ball_count {
            config.divergence.ball_count = count;
        }
        if !self.delta_ts.is_empty() {
            config.divergence.delta_ts = self.delta_ts.clone();
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ErrorArgs {
    /// Directory holding `<method>/<delta_t>.txt` series
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Methods to include (kebab-case names)
    #[arg(short, long = "method", value_delimiter = ',')]
    pub methods: Vec<Method>,

    /// Order of the timestep axis
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Timestep whose trajectories are overlaid
    #[arg(long)]
    pub overlay_delta_t: Option<f64>,

    /// Skip the trajectory overlay
    #[arg(long)]
    pub no_overlay: bool,
}

impl ErrorArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(dir) = &self.data_dir {
            config.errors.data_dir = dir.clone();
        }
        if !self.methods.is_empty() {
            config.errors.methods = self.methods.clone();
        }
        if let Some(order) = self.order {
            config.errors.order = order.into();
        }
        if let Some(dt) = self.overlay_delta_t {
            config.errors.overlay_delta_t = dt;
        }
        if self.no_overlay {
            config.errors.overlay_methods.clear();
        }
    }
}

#[derive(Args, Debug)]
pub struct TimingArgs {
    /// Directory holding `<position>.txt` timing lists
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Order of the position axis
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

impl TimingArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(dir) = &self.data_dir {
            config.timings.data_dir = dir.clone();
        }
        if let Some(order) = self.order {
            config.timings.order = order.into();
        }
    }
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[arg(value_enum)]
    pub experiment: Experiment,

    /// Print the simulator command lines without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Experiment {
    /// Billiards at each configured timestep
    Divergence,
    /// Oscillator for every method and timestep
    Methods,
    /// Repeated billiards benchmarks over white ball positions
    LuckyShot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_divergence_overrides() {
        let cli = Cli::try_parse_from([
            "idyn",
            "--format",
            "json",
            "divergence",
            "--ball-count",
            "2",
            "-t",
            "0.01,0.001",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, PathBuf::from("idyn.toml"));

        let Commands::Divergence(args) = cli.command else {
            panic!("expected divergence command");
        };
        let mut config = AnalysisConfig::default();
        args.apply(&mut config);
        assert_eq!(config.divergence.ball_count, 2);
        assert_eq!(config.divergence.delta_ts, vec![0.01, 0.001]);
    }

    #[test]
    fn test_error_overrides() {
        let cli = Cli::try_parse_from([
            "idyn",
            "errors",
            "--method",
            "euler,velocity-verlet",
            "--order",
            "descending",
            "--no-overlay",
        ])
        .unwrap();
        let Commands::Errors(args) = cli.command else {
            panic!("expected errors command");
        };
        let mut config = AnalysisConfig::default();
        args.apply(&mut config);
        assert_eq!(config.errors.methods, vec![Method::Euler, Method::VelocityVerlet]);
        assert_eq!(config.errors.order, SortOrder::Descending);
        assert!(config.errors.overlay_methods.is_empty());
    }

    #[test]
    fn test_timing_order_override() {
        let cli = Cli::try_parse_from(["idyn", "timings", "--order", "descending"]).unwrap();
        let Commands::Timings(args) = cli.command else {
            panic!("expected timings command");
        };
        let mut config = AnalysisConfig::default();
        args.apply(&mut config);
        assert_eq!(config.timings.order, SortOrder::Descending);

        let cli = Cli::try_parse_from(["idyn", "timings"]).unwrap();
        let Commands::Timings(args) = cli.command else {
            panic!("expected timings command");
        };
        let mut config = AnalysisConfig::default();
        config.timings.order = SortOrder::Descending;
        args.apply(&mut config);
        assert_eq!(config.timings.order, SortOrder::Descending);
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(Cli::try_parse_from(["idyn", "errors", "--method", "rk4"]).is_err());
    }

    #[test]
    fn test_sweep_experiment_names() {
        let cli = Cli::try_parse_from(["idyn", "sweep", "lucky-shot", "--dry-run"]).unwrap();
        let Commands::Sweep(args) = cli.command else {
            panic!("expected sweep command");
        };
        assert_eq!(args.experiment, Experiment::LuckyShot);
        assert!(args.dry_run);
    }
}
