//! `co-stats` — the merged statistics table persisted after every run.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`row`]    | `RunStatsRow`, `COLUMNS` (fixed header order)                |
//! | [`merge`]  | `merge`, `RunStats`, `RouteAssignments`                      |
//! | [`error`]  | `StatsError`, `StatsResult<T>`                               |
//!
//! # Join semantics
//!
//! `merge` is a left join of position records with trip records on vehicle
//! id.  Every position row survives; trip columns of vehicles that have not
//! finished are `None`.  The result is then annotated with the run number and
//! the route each vehicle was assigned when the run began.

pub mod error;
pub mod merge;
pub mod row;


pub use error::{StatsError, StatsResult};
pub use merge::{RouteAssignments, RunStats, merge};
pub use row::{COLUMNS, RunStatsRow};
