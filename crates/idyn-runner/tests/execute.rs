//! Sweep execution against stand-in executables.
#![cfg(unix)]

use std::fs;

use idyn_runner::{PlannedRun, RunError, SimulatorInvocation, SweepPlan, execute};
use tempfile::tempdir;

fn plan(output_dir: &std::path::Path, runs: Vec<PlannedRun>) -> SweepPlan {
    SweepPlan {
        name: "test".to_string(),
        output_dir: output_dir.to_path_buf(),
        runs,
    }
}

#[test]
fn test_benchmark_runs_append_elapsed_token() {
    let dir = tempdir().unwrap();
    let results = dir.path().join("timings").join("0.42.txt");
    // echo prints its arguments, so the method string stands in for the report
    let run = PlannedRun {
        label: "y=0.42".to_string(),
        invocation: SimulatorInvocation::new("echo", "Simulation took 12.5 seconds")
            .white_offset(0.14)
            .ball_count_stop(8),
        results_file: Some(results.clone()),
    };

    let outcome = execute(&plan(dir.path(), vec![run.clone(), run])).unwrap();
    assert_eq!(outcome.runs, 2);
    assert_eq!(outcome.samples, 2);
    assert_eq!(fs::read_to_string(&results).unwrap(), "12.5\n12.5\n");
}

#[test]
fn test_dump_runs_create_output_directories() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("methods").join("euler").join("0.01.txt");
    let run = PlannedRun {
        label: "euler".to_string(),
        invocation: SimulatorInvocation::new("true", "euler").data_output_path(&out),
        results_file: None,
    };

    let outcome = execute(&plan(&dir.path().join("methods"), vec![run])).unwrap();
    assert_eq!(outcome.runs, 1);
    assert_eq!(outcome.samples, 0);
    assert!(out.parent().unwrap().is_dir());
}

#[test]
fn test_non_zero_exit_stops_sweep() {
    let dir = tempdir().unwrap();
    let results = dir.path().join("0.5.txt");
    let failing = PlannedRun {
        label: "fails".to_string(),
        invocation: SimulatorInvocation::new("false", "euler"),
        results_file: None,
    };
    let never_run = PlannedRun {
        label: "after".to_string(),
        invocation: SimulatorInvocation::new("echo", "a b 1.0"),
        results_file: Some(results.clone()),
    };

    let err = execute(&plan(dir.path(), vec![failing, never_run])).unwrap_err();
    assert!(matches!(err, RunError::ExitStatus { .. }));
    assert!(!results.exists());
}

#[test]
fn test_missing_executable_is_spawn_error() {
    let dir = tempdir().unwrap();
    let run = PlannedRun {
        label: "missing".to_string(),
        invocation: SimulatorInvocation::new(dir.path().join("no-such-simulator"), "euler"),
        results_file: None,
    };
    assert!(matches!(
        execute(&plan(dir.path(), vec![run])),
        Err(RunError::Spawn { .. })
    ));
}

#[test]
fn test_unparseable_report_is_rejected() {
    let dir = tempdir().unwrap();
    // echo prints "took -w0.1": only two tokens
    let run = PlannedRun {
        label: "garbled".to_string(),
        invocation: SimulatorInvocation::new("echo", "took").white_offset(0.1),
        results_file: Some(dir.path().join("0.42.txt")),
    };
    assert!(matches!(
        execute(&plan(dir.path(), vec![run])),
        Err(RunError::MissingElapsed { .. })
    ));
}
