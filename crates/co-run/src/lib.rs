//! `co-run` — the run driver for the carryover experiment.
//!
//! # One run
//!
//! ```text
//! latest snapshot ──▶ Planner ──▶ control input ──▶ Simulator (blocking)
//!        ▲                                                 │
//!        │                                                 ▼
//!  HistoryStore ◀── merge + annotate ◀── parse dump / tripinfo / edge data
//! ```
//!
//! The first run has no snapshot: every tracked vehicle starts on the
//! configured bootstrap route and the planner is skipped.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`simulator`] | `Simulator` trait, `SumoProcess`, `RunRequest`, `RunArtifacts` |
//! | [`driver`]    | `Driver`, `PreparedRun`, `RunSummary`                   |
//! | [`builder`]   | `DriverBuilder`                                         |
//! | [`observer`]  | `RunObserver`, `NoopObserver`                           |
//! | [`error`]     | `RunError`, `RunResult<T>`                              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use co_core::ExperimentConfig;
//! use co_run::{DriverBuilder, NoopObserver, SumoProcess};
//!
//! let config = ExperimentConfig::load(Path::new("carryover.toml"))?;
//! let sumo = SumoProcess::new(config.simulator.clone());
//! let mut driver = DriverBuilder::new(config, sumo).build()?;
//! driver.run_many(5, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod driver;
pub mod error;
pub mod observer;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use builder::DriverBuilder;
pub use driver::{Driver, PreparedRun, RunSummary};
pub use error::{RunError, RunResult};
pub use observer::{NoopObserver, RunObserver};
pub use simulator::{RunArtifacts, RunRequest, Simulator, SumoProcess};
