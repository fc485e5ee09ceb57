//! Carryover planner.
//!
//! Input is the final timestep of the previous run's merged statistics.  A
//! tracked vehicle listed there without a trip record has neither arrived nor
//! been vaporized, so it continues; every other slot is free and restarts on
//! a random route.  The trip record check matters when the dump ends with
//! empty timesteps: the final rows then belong to vehicles that already left.

use std::collections::HashMap;

use co_core::{Fleet, InvalidStatePolicy, RouteRegistry, RouteRng, VehicleId};
use co_stats::{RunStats, RunStatsRow};

use crate::error::InvalidState;
use crate::plan::{CarryoverPlan, Decision, PlanEntry, ResumeState};
use crate::{PlanError, PlanResult};

/// Builds a [`CarryoverPlan`] for one run.
///
/// Holds only borrowed, read-only experiment state; the RNG is passed per
/// call so the caller controls seeding.
pub struct Planner<'a> {
    registry: &'a RouteRegistry,
    fleet:    &'a Fleet,
    policy:   InvalidStatePolicy,
}

impl<'a> Planner<'a> {
    pub fn new(registry: &'a RouteRegistry, fleet: &'a Fleet) -> Self {
        Self {
            registry,
            fleet,
            policy: InvalidStatePolicy::default(),
        }
    }

    /// Choose how to handle survivors that cannot resume.  Default: abort.
    pub fn on_invalid_state(mut self, policy: InvalidStatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Plan from a full previous snapshot (all timesteps).
    pub fn plan_from_snapshot(&self, previous: &RunStats, rng: &mut RouteRng) -> PlanResult<CarryoverPlan> {
        let last = previous.last_timestep()?;
        self.plan(&last, rng)
    }

    /// Plan from the rows of the previous run's final timestep.
    ///
    /// Restart routes are drawn in slot order, so the same `rng` state always
    /// yields the same plan.
    pub fn plan(&self, last_rows: &[&RunStatsRow], rng: &mut RouteRng) -> PlanResult<CarryoverPlan> {
        // ── Index survivors, asserting one row per vehicle ────────────────
        let mut survivors: HashMap<&str, &RunStatsRow> = HashMap::with_capacity(last_rows.len());
        for &row in last_rows {
            if survivors.insert(row.car_id.as_str(), row).is_some() {
                return Err(PlanError::DuplicateVehicle(row.car_id.clone()));
            }
            if !self.fleet.contains(row.car_id.as_str()) {
                log::debug!("ignoring untracked vehicle {} in snapshot", row.car_id);
            }
        }
        survivors.retain(|id, row| {
            let finished = row.has_finished();
            if finished {
                log::debug!("vehicle {id} finished its trip; slot is free");
            }
            !finished
        });

        // ── One decision per slot ─────────────────────────────────────────
        let mut entries = Vec::with_capacity(self.fleet.size);
        for vehicle in self.fleet.ids() {
            let entry = match survivors.get(vehicle.as_str()) {
                Some(row) => match self.resume(row) {
                    Ok(entry) => entry,
                    Err(reason) => match self.policy {
                        InvalidStatePolicy::Abort => {
                            return Err(PlanError::InvalidCarryoverState { vehicle, reason });
                        }
                        InvalidStatePolicy::Restart => {
                            log::warn!("vehicle {vehicle} cannot resume ({reason}); restarting it");
                            self.restart(vehicle, rng)?
                        }
                    },
                },
                None => self.restart(vehicle, rng)?,
            };
            log::debug!("{} → {} ({:?})", entry.vehicle, entry.route, entry.decision);
            entries.push(entry);
        }

        let plan = CarryoverPlan::new(entries);
        log::info!(
            "planned {} vehicles: {} continuing, {} restarting",
            plan.len(),
            plan.continuing(),
            plan.restarting()
        );
        Ok(plan)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn resume(&self, row: &RunStatsRow) -> Result<PlanEntry, InvalidState> {
        let route_id = row
            .assigned_route_at_start
            .as_ref()
            .ok_or(InvalidState::NoAssignedRoute)?;
        let route = self
            .registry
            .get(route_id.as_str())
            .ok_or_else(|| InvalidState::UnknownRoute(route_id.clone()))?;
        let edge_index = route
            .edge_index(row.edge_id.as_str())
            .ok_or_else(|| InvalidState::EdgeNotOnRoute {
                edge:  row.edge_id.clone(),
                route: route_id.clone(),
            })?;
        let lane = row
            .lane_id
            .index_suffix()
            .ok_or_else(|| InvalidState::BadLane(row.lane_id.clone()))?;

        Ok(PlanEntry {
            vehicle:  row.car_id.clone(),
            route:    route_id.clone(),
            decision: Decision::Continue(ResumeState {
                edge_index,
                lane:  lane.to_owned(),
                pos:   row.pos.clone(),
                speed: row.speed.clone(),
            }),
        })
    }

    fn restart(&self, vehicle: VehicleId, rng: &mut RouteRng) -> PlanResult<PlanEntry> {
        let Some(route) = rng.choose(self.registry.ids()) else {
            return Err(PlanError::EmptyRegistry(vehicle));
        };
        Ok(PlanEntry {
            vehicle,
            route:    route.clone(),
            decision: Decision::Restart,
        })
    }
}
