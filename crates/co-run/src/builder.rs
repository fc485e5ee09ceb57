//! Fluent builder for constructing a [`Driver`].

use std::fs;
use std::path::PathBuf;

use co_core::ExperimentConfig;
use co_output::HistoryStore;

use crate::{Driver, RunResult, Simulator};

/// Fluent builder for [`Driver<S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                    |
/// |--------------------|----------------------------|
/// | `.work_dir(p)`     | `config.paths.work_dir`    |
/// | `.export_dir(p)`   | `config.paths.export_dir`  |
///
/// # Example
///
/// ```rust,ignore
/// let config = ExperimentConfig::load(Path::new("carryover.toml"))?;
/// let sumo = SumoProcess::new(config.simulator.clone());
/// let mut driver = DriverBuilder::new(config, sumo).build()?;
/// driver.run_once(&mut NoopObserver)?;
/// ```
pub struct DriverBuilder<S: Simulator> {
    config:     ExperimentConfig,
    simulator:  S,
    work_dir:   Option<PathBuf>,
    export_dir: Option<PathBuf>,
}

impl<S: Simulator> DriverBuilder<S> {
    pub fn new(config: ExperimentConfig, simulator: S) -> Self {
        Self {
            config,
            simulator,
            work_dir:   None,
            export_dir: None,
        }
    }

    /// Override where the control input and raw simulator output go.
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Override where CSV exports and history go.
    pub fn export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// Validate the experiment, create both directories, and return a
    /// ready-to-run [`Driver`].
    pub fn build(self) -> RunResult<Driver<S>> {
        self.config.validate()?;
        let registry = self.config.registry()?;

        let work_dir = self.work_dir.unwrap_or_else(|| self.config.paths.work_dir.clone());
        let export_dir = self.export_dir.unwrap_or_else(|| self.config.paths.export_dir.clone());
        fs::create_dir_all(&work_dir)?;
        let store = HistoryStore::open(&export_dir)?;

        Ok(Driver {
            config:    self.config,
            registry,
            store,
            work_dir,
            simulator: self.simulator,
        })
    }
}
