//! `co-plan` — decides how each tracked vehicle enters the next run and
//! renders the simulator's route/vehicle input.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`plan`]    | `Decision`, `ResumeState`, `PlanEntry`, `CarryoverPlan`     |
//! | [`planner`] | `Planner` — snapshot + registry → `CarryoverPlan`           |
//! | [`control`] | `ControlDocument`, `render`, `render_bootstrap`             |
//! | [`error`]   | `PlanError`, `InvalidState`, `PlanResult<T>`                |
//!
//! # Carryover rule (summary)
//!
//! ```text
//! vehicle in last timestep of previous run → Continue on its previous route,
//!                                            resuming at edge index / lane /
//!                                            pos / speed it was last seen at
//! otherwise                                → Restart on a seeded-random route
//! no previous run                          → bootstrap: everyone restarts on
//!                                            the configured default route
//! ```

pub mod control;
pub mod error;
pub mod plan;
pub mod planner;


pub use control::{ControlDocument, VehicleDef, render, render_bootstrap};
pub use error::{InvalidState, PlanError, PlanResult};
pub use plan::{CarryoverPlan, Decision, PlanEntry, ResumeState};
pub use planner::Planner;
