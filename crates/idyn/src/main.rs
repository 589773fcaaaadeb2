//! Trajectory divergence and integration-error analysis
//!
//! Main entry point.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use idyn::cli::{Cli, Commands, OutputFormat};
use idyn::commands::{describe_plan, run_divergence, run_errors, run_sweep, run_timings, sweep_plan};
use idyn_compare::report::AnalysisReport;
use idyn_core::AnalysisConfig;

fn main() {
    idyn::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AnalysisConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Divergence(args) => {
            args.apply(&mut config);
            emit(&run_divergence(&config)?, cli.format);
        }
        Commands::Errors(args) => {
            args.apply(&mut config);
            emit(&run_errors(&config)?, cli.format);
        }
        Commands::Timings(args) => {
            args.apply(&mut config);
            emit(&run_timings(&config)?, cli.format);
        }
        Commands::Sweep(args) => {
            if args.dry_run {
                print!("{}", describe_plan(&sweep_plan(&config, args.experiment)));
            } else {
                let outcome = run_sweep(&config, args.experiment)?;
                println!("{} runs, {} timing samples", outcome.runs, outcome.samples);
            }
        }
        Commands::Config => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn emit(report: &AnalysisReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", report.to_json()),
        OutputFormat::Summary => report.print_summary(),
    }
}
