use std::path::PathBuf;
use std::process::ExitStatus;

use co_core::CoreError;
use co_output::OutputError;
use co_parse::ParseError;
use co_plan::PlanError;
use co_stats::StatsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Core(#[from] CoreError),

    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("malformed simulator output: {0}")]
    Parse(#[from] ParseError),

    #[error("merge failed: {0}")]
    Stats(#[from] StatsError),

    #[error("export failed: {0}")]
    Output(#[from] OutputError),

    #[error("could not start simulator `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("simulator `{binary}` exited with {status}")]
    SimulatorFailed {
        binary: String,
        status: ExitStatus,
    },

    #[error("simulator did not produce {0}")]
    MissingOutput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RunResult<T> = Result<T, RunError>;
