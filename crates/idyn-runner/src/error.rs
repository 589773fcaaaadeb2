use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures while running a sweep. The first one aborts the sweep.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' exited with {status}", program.display())]
    ExitStatus {
        program: PathBuf,
        status: ExitStatus,
    },

    #[error("no elapsed-time token in simulator output {stdout:?}")]
    MissingElapsed { stdout: String },

    #[error("invalid elapsed time {token:?}")]
    InvalidElapsed { token: String },

    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
