//! Per-vehicle decisions for the next run.

use co_core::{Fleet, RouteId, VehicleId};
use co_stats::RouteAssignments;

/// Where a continuing vehicle re-enters the network.
///
/// `lane`, `pos` and `speed` are carried as the simulator's own text so the
/// next run starts from exactly the recorded values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    /// 0-based index of the vehicle's last edge within its route.
    pub edge_index: usize,
    /// Lane index (the suffix of `<edgeId>_<laneIndex>`).
    pub lane:       String,
    pub pos:        String,
    pub speed:      String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Still on the network at the end of the previous run.
    Continue(ResumeState),
    /// Slot freed (arrived or vaporized) or first run: depart fresh at 0.
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub vehicle:  VehicleId,
    pub route:    RouteId,
    pub decision: Decision,
}

impl PlanEntry {
    #[inline]
    pub fn resume(&self) -> Option<&ResumeState> {
        match &self.decision {
            Decision::Continue(state) => Some(state),
            Decision::Restart => None,
        }
    }
}

/// One entry per tracked vehicle, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryoverPlan {
    entries: Vec<PlanEntry>,
}

impl CarryoverPlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    /// First-run assignment: every slot restarts on `route`.
    pub fn bootstrap(fleet: &Fleet, route: &RouteId) -> Self {
        Self::new(
            fleet
                .ids()
                .map(|vehicle| PlanEntry {
                    vehicle,
                    route:    route.clone(),
                    decision: Decision::Restart,
                })
                .collect(),
        )
    }

    #[inline]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn get(&self, vehicle: &str) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.vehicle.as_str() == vehicle)
    }

    /// Vehicle → route map recorded as `assignedRouteAtStart` for this run.
    pub fn assignments(&self) -> RouteAssignments {
        self.entries
            .iter()
            .map(|e| (e.vehicle.clone(), e.route.clone()))
            .collect()
    }

    pub fn continuing(&self) -> usize {
        self.entries.iter().filter(|e| e.resume().is_some()).count()
    }

    pub fn restarting(&self) -> usize {
        self.entries.len() - self.continuing()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
