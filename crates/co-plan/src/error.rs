use co_core::{CoreError, EdgeId, LaneId, RouteId, VehicleId};
use co_stats::StatsError;
use thiserror::Error;

/// Why a surviving vehicle cannot resume where it was last seen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidState {
    #[error("no route was recorded for it at the start of the previous run")]
    NoAssignedRoute,

    #[error("its previous route {0} is not registered")]
    UnknownRoute(RouteId),

    #[error("its last edge {edge} is not on its route {route}")]
    EdgeNotOnRoute { edge: EdgeId, route: RouteId },

    #[error("its last lane {0} has no numeric lane index")]
    BadLane(LaneId),
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid carryover state for vehicle {vehicle}: {reason}")]
    InvalidCarryoverState {
        vehicle: VehicleId,
        reason:  InvalidState,
    },

    #[error("vehicle {0} appears more than once in the last timestep of the snapshot")]
    DuplicateVehicle(VehicleId),

    #[error("route registry is empty; cannot choose a route for vehicle {0}")]
    EmptyRegistry(VehicleId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("generated document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
