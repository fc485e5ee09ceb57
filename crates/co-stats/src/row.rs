//! The persisted row type.

use serde::{Deserialize, Serialize};

use co_core::{EdgeId, LaneId, RouteId, VehicleId};

/// Header of the merged statistics CSV, in order.
pub const COLUMNS: [&str; 23] = [
    "time",
    "carID",
    "depart",
    "edgeID",
    "departLane",
    "laneID",
    "arrivalLane",
    "departPos",
    "pos",
    "arrivalPos",
    "departSpeed",
    "speed",
    "arrivalSpeed",
    "departDelay",
    "waitingTime",
    "duration",
    "arrival",
    "routeLength",
    "rerouteNo",
    "speedFactor",
    "vaporized",
    "runNumber",
    "assignedRouteAtStart",
];

/// One (vehicle, timestep) observation joined with the vehicle's trip.
///
/// Trip columns are `None` both for vehicles without a trip record and for
/// attributes the simulator left empty; the CSV cannot tell them apart.
///
/// Field order is the CSV column order; serde derives the header from the
/// renamed field names, so reordering fields changes the file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatsRow {
    pub time:          String,
    #[serde(rename = "carID")]
    pub car_id:        VehicleId,
    pub depart:        Option<String>,
    #[serde(rename = "edgeID")]
    pub edge_id:       EdgeId,
    #[serde(rename = "departLane")]
    pub depart_lane:   Option<String>,
    #[serde(rename = "laneID")]
    pub lane_id:       LaneId,
    #[serde(rename = "arrivalLane")]
    pub arrival_lane:  Option<String>,
    #[serde(rename = "departPos")]
    pub depart_pos:    Option<String>,
    pub pos:           String,
    #[serde(rename = "arrivalPos")]
    pub arrival_pos:   Option<String>,
    #[serde(rename = "departSpeed")]
    pub depart_speed:  Option<String>,
    pub speed:         String,
    #[serde(rename = "arrivalSpeed")]
    pub arrival_speed: Option<String>,
    #[serde(rename = "departDelay")]
    pub depart_delay:  Option<String>,
    #[serde(rename = "waitingTime")]
    pub waiting_time:  Option<String>,
    pub duration:      Option<String>,
    pub arrival:       Option<String>,
    #[serde(rename = "routeLength")]
    pub route_length:  Option<String>,
    #[serde(rename = "rerouteNo")]
    pub reroute_no:    Option<String>,
    #[serde(rename = "speedFactor")]
    pub speed_factor:  Option<String>,
    pub vaporized:     Option<String>,

    #[serde(rename = "runNumber")]
    pub run_number:    u32,
    #[serde(rename = "assignedRouteAtStart")]
    pub assigned_route_at_start: Option<RouteId>,
}

impl RunStatsRow {
    /// `true` once the vehicle has a trip record: it reached its destination
    /// or was vaporized during the run, even if it still has position rows.
    pub fn has_finished(&self) -> bool {
        self.arrival.is_some() || self.vaporized.is_some()
    }

    /// `time` as a number, for finding the last timestep.
    pub fn time_secs(&self) -> Option<f64> {
        self.time.trim().parse::<f64>().ok().filter(|t| t.is_finite())
    }
}
