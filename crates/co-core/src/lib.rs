//! `co-core` — foundational types for the carryover workspace.
//!
//! This crate is a dependency of every other `co-*` crate.  It has no `co-*`
//! dependencies and only a handful of external ones (`rand`, `serde`, `toml`,
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `VehicleId`, `RouteId`, `EdgeId`, `LaneId`                |
//! | [`routes`]  | `Route`, `RouteRegistry`                                  |
//! | [`fleet`]   | `Fleet` — the fixed pool of tracked vehicle slots         |
//! | [`rng`]     | `RouteRng` (seeded, derived per run)                      |
//! | [`config`]  | `ExperimentConfig` and its TOML sections                  |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |

pub mod config;
pub mod error;
pub mod fleet;
pub mod ids;
pub mod rng;
pub mod routes;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    BootstrapConfig, ExperimentConfig, InvalidStatePolicy, PathsConfig, SimulatorConfig,
    VehicleType,
};
pub use error::{CoreError, CoreResult};
pub use fleet::Fleet;
pub use ids::{EdgeId, LaneId, RouteId, VehicleId};
pub use rng::RouteRng;
pub use routes::{Route, RouteRegistry};
