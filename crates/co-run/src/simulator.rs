//! The external simulator boundary.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use log::info;

use co_core::SimulatorConfig;

use crate::{RunError, RunResult};

/// Everything the simulator needs for one run.
///
/// Output paths are chosen by the driver; a [`Simulator`] must write to
/// exactly these locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub run_number: u32,
    pub work_dir:   PathBuf,
    pub route_file: PathBuf,
    pub steps:      u64,
    pub dump:       PathBuf,
    pub tripinfo:   PathBuf,
    /// Expected edge-aggregate outputs, when the experiment declares them.
    pub edge_data:  Option<PathBuf>,
    pub emissions:  Option<PathBuf>,
}

impl RunRequest {
    /// Every file the simulator is expected to produce.
    pub fn outputs(&self) -> Vec<&PathBuf> {
        let mut paths = vec![&self.dump, &self.tripinfo];
        paths.extend(self.edge_data.as_ref());
        paths.extend(self.emissions.as_ref());
        paths
    }
}

/// Files produced by a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub dump:      PathBuf,
    pub tripinfo:  PathBuf,
    pub edge_data: Option<PathBuf>,
    pub emissions: Option<PathBuf>,
}

impl RunArtifacts {
    /// The artifacts a well-behaved simulator leaves for `request`.
    pub fn expected(request: &RunRequest) -> Self {
        Self {
            dump:      request.dump.clone(),
            tripinfo:  request.tripinfo.clone(),
            edge_data: request.edge_data.clone(),
            emissions: request.emissions.clone(),
        }
    }

    /// Fail with [`RunError::MissingOutput`] on the first absent file.
    pub fn ensure_present(&self) -> RunResult<()> {
        let required = [Some(&self.dump), Some(&self.tripinfo), self.edge_data.as_ref(), self.emissions.as_ref()];
        for path in required.into_iter().flatten() {
            if !path.is_file() {
                return Err(RunError::MissingOutput(path.clone()));
            }
        }
        Ok(())
    }
}

/// A traffic simulator that can execute one blocking run.
pub trait Simulator {
    fn run(&mut self, request: &RunRequest) -> RunResult<RunArtifacts>;
}

// ── SumoProcess ───────────────────────────────────────────────────────────────

/// Runs the configured simulator binary as a child process.
#[derive(Debug, Clone)]
pub struct SumoProcess {
    config: SimulatorConfig,
}

impl SumoProcess {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments for `request`, extra args last.
    pub fn args(&self, request: &RunRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-c".into(),
            self.config.config_file.clone().into(),
            "--route-files".into(),
            request.route_file.clone().into(),
            "--netstate-dump".into(),
            request.dump.clone().into(),
            "--tripinfo-output".into(),
            request.tripinfo.clone().into(),
            "--end".into(),
            request.steps.to_string().into(),
        ];
        args.extend(self.config.extra_args.iter().map(OsString::from));
        args
    }
}

impl Simulator for SumoProcess {
    fn run(&mut self, request: &RunRequest) -> RunResult<RunArtifacts> {
        let binary = &self.config.binary;
        info!("run {}: starting {binary} for {} steps", request.run_number, request.steps);

        let status = Command::new(binary)
            .args(self.args(request))
            .status()
            .map_err(|source| RunError::Spawn { binary: binary.clone(), source })?;
        if !status.success() {
            return Err(RunError::SimulatorFailed { binary: binary.clone(), status });
        }

        Ok(RunArtifacts::expected(request))
    }
}
