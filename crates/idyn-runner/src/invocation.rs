//! Command lines for the simulator executables.

use std::path::{Path, PathBuf};
use std::process::Command;

/// One simulator run: executable, integration method and flags.
///
/// Values are passed through as given; the simulator validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorInvocation {
    program: PathBuf,
    method: String,
    data_output_path: Option<PathBuf>,
    simulation_delta_t: Option<f64>,
    output_delta_t: Option<f64>,
    max_time: Option<f64>,
    ball_count_stop: Option<usize>,
    white_offset: Option<f64>,
    fixed_spacing: bool,
    ignore_holes: bool,
}

impl SimulatorInvocation {
    pub fn new(program: impl Into<PathBuf>, method: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            method: method.into(),
            data_output_path: None,
            simulation_delta_t: None,
            output_delta_t: None,
            max_time: None,
            ball_count_stop: None,
            white_offset: None,
            fixed_spacing: false,
            ignore_holes: false,
        }
    }

    pub fn data_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_output_path = Some(path.into());
        self
    }

    pub fn simulation_delta_t(mut self, delta_t: f64) -> Self {
        self.simulation_delta_t = Some(delta_t);
        self
    }

    pub fn output_delta_t(mut self, delta_t: f64) -> Self {
        self.output_delta_t = Some(delta_t);
        self
    }

    /// Stop after `max_time` simulated seconds.
    pub fn max_time(mut self, max_time: f64) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Stop once `count` balls have been pocketed.
    pub fn ball_count_stop(mut self, count: usize) -> Self {
        self.ball_count_stop = Some(count);
        self
    }

    /// Shift the white ball's initial Y position.
    pub fn white_offset(mut self, offset: f64) -> Self {
        self.white_offset = Some(offset);
        self
    }

    pub fn fixed_spacing(mut self, enabled: bool) -> Self {
        self.fixed_spacing = enabled;
        self
    }

    pub fn ignore_holes(mut self, enabled: bool) -> Self {
        self.ignore_holes = enabled;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.data_output_path.as_deref()
    }

    /// Argument vector, method first.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.method.clone()];
        if let Some(offset) = self.white_offset {
            args.push(format!("-w{offset}"));
        }
        if self.fixed_spacing {
            args.push("-f".to_string());
        }
        if self.ignore_holes {
            args.push("-i".to_string());
        }
        if let Some(path) = &self.data_output_path {
            args.push("--data-output-path".to_string());
            args.push(path.display().to_string());
        }
        if let Some(dt) = self.simulation_delta_t {
            args.push("--simulation-delta-t".to_string());
            args.push(dt.to_string());
        }
        if let Some(dt) = self.output_delta_t {
            args.push("--output-delta-t".to_string());
            args.push(dt.to_string());
        }
        if let Some(max_time) = self.max_time {
            args.push(format!("-m{max_time}"));
        }
        if let Some(count) = self.ball_count_stop {
            args.push("-b".to_string());
            args.push(count.to_string());
        }
        args
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args());
        command
    }
}
