//! Experiment configuration.
//!
//! One TOML file describes a whole experiment: the route table, the tracked
//! fleet, the simulator invocation and where artifacts go.  It is read once
//! at start-up and threaded explicitly through the run driver.
//!
//! ```toml
//! seed  = 42
//! steps = 100
//! on_invalid_state = "abort"
//!
//! [fleet]
//! prefix = "car"
//! size   = 10
//!
//! [bootstrap]
//! route = "route0"
//!
//! [[routes]]
//! id    = "route0"
//! edges = ["E0", "E12", "E4", "E7"]
//!
//! [paths]
//! work_dir   = "work"
//! export_dir = "csv"
//!
//! [simulator]
//! binary      = "sumo"
//! config_file = "straight.sumocfg"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{CoreError, CoreResult, Fleet, Route, RouteId, RouteRegistry};

// ── Sections ──────────────────────────────────────────────────────────────────

/// What to do with a surviving vehicle whose last edge is not on its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidStatePolicy {
    /// Fail the whole run before the simulator is started.
    #[default]
    Abort,
    /// Treat the vehicle as a freed slot and draw a fresh route.
    Restart,
}

/// Vehicle type written once at the top of every control-input document.
///
/// Defaults are the passenger-car values of the simulator's TraCI tutorial.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleType {
    pub id:        String,
    pub accel:     f64,
    pub decel:     f64,
    pub sigma:     f64,
    pub length:    f64,
    pub min_gap:   f64,
    pub max_speed: f64,
    pub gui_shape: String,
}

impl Default for VehicleType {
    fn default() -> Self {
        Self {
            id:        "car".to_owned(),
            accel:     0.8,
            decel:     4.5,
            sigma:     0.5,
            length:    5.0,
            min_gap:   2.5,
            max_speed: 16.67,
            gui_shape: "passenger".to_owned(),
        }
    }
}

/// Route every tracked vehicle gets on the very first run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootstrapConfig {
    pub route: RouteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Generated control input and raw simulator output for the current run.
    pub work_dir:   PathBuf,
    /// CSV exports: latest snapshot, raw exports and `history/`.
    pub export_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            work_dir:   PathBuf::from("work"),
            export_dir: PathBuf::from("csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulatorConfig {
    /// Executable name or path, e.g. `sumo` or `sumo-gui`.
    #[serde(default = "default_binary")]
    pub binary:      String,
    /// Simulator configuration file passed with `-c`.
    pub config_file: PathBuf,
    #[serde(default)]
    pub extra_args:  Vec<String>,
    /// Edge-aggregate output written by the simulator (declared in its own
    /// additional file), relative to the working directory.
    #[serde(default)]
    pub edge_data:   Option<PathBuf>,
    /// Emissions variant of the edge-aggregate output.
    #[serde(default)]
    pub emissions:   Option<PathBuf>,
}

fn default_binary() -> String {
    "sumo".to_owned()
}

// ── ExperimentConfig ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    /// Master seed for restart route choice.  The same seed and the same
    /// latest snapshot always produce the same control input.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Simulator steps per run.  Every run executes exactly this many.
    pub steps: u64,

    #[serde(default)]
    pub on_invalid_state: InvalidStatePolicy,

    pub fleet:     Fleet,
    pub bootstrap: BootstrapConfig,
    pub routes:    Vec<Route>,

    #[serde(default)]
    pub vehicle_type: VehicleType,

    #[serde(default)]
    pub paths: PathsConfig,

    pub simulator: SimulatorConfig,
}

fn default_seed() -> u64 {
    42
}

impl ExperimentConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: ExperimentConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> CoreResult<()> {
        if self.steps == 0 {
            return Err(CoreError::Config("steps must be greater than zero".into()));
        }
        if self.fleet.size == 0 {
            return Err(CoreError::Config("fleet.size must be greater than zero".into()));
        }
        if self.fleet.prefix.is_empty() {
            return Err(CoreError::Config("fleet.prefix must not be empty".into()));
        }
        if self.routes.is_empty() {
            return Err(CoreError::Config("at least one [[routes]] entry is required".into()));
        }
        let registry = self.registry()?;
        registry.require(self.bootstrap.route.as_str())?;
        Ok(())
    }

    /// Build the route registry described by `[[routes]]`.
    pub fn registry(&self) -> CoreResult<RouteRegistry> {
        RouteRegistry::from_routes(self.routes.iter().cloned())
    }
}
