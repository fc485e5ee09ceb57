//! Left join of position records with trip records, plus run annotation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use co_core::{RouteId, VehicleId};
use co_parse::{TripRecord, VehicleRecord};

use crate::{RunStatsRow, StatsError, StatsResult};

/// Route each vehicle was given when a run began.
pub type RouteAssignments = HashMap<VehicleId, RouteId>;

/// The merged table for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub rows: Vec<RunStatsRow>,
}

impl RunStats {
    pub fn new(rows: Vec<RunStatsRow>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stamp every row with `run_number` and the vehicle's starting route.
    ///
    /// Vehicles missing from `assignments` get `None`.
    pub fn annotate(&mut self, run_number: u32, assignments: &RouteAssignments) {
        for row in &mut self.rows {
            row.run_number = run_number;
            row.assigned_route_at_start = assignments.get(row.car_id.as_str()).cloned();
        }
    }

    /// Highest `runNumber` in the table, `None` when empty.
    pub fn max_run_number(&self) -> Option<u32> {
        self.rows.iter().map(|r| r.run_number).max()
    }

    /// Rows observed at the final timestep (numerically largest `time`).
    ///
    /// Fails on any unparseable `time`.  Empty table → empty result.
    pub fn last_timestep(&self) -> StatsResult<Vec<&RunStatsRow>> {
        let mut times = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let t = row.time_secs().ok_or_else(|| StatsError::BadNumber {
                column: "time",
                value:  row.time.clone(),
            })?;
            times.push(t);
        }
        let Some(last) = times.iter().copied().reduce(f64::max) else {
            return Ok(Vec::new());
        };
        Ok(self
            .rows
            .iter()
            .zip(times)
            .filter(|&(_, t)| t == last)
            .map(|(row, _)| row)
            .collect())
    }
}

/// Left-join `vehicles` with `trips` on vehicle id.
///
/// Output has exactly one row per vehicle record, in input order.  Empty trip
/// attributes (the simulator writes `vaporized=""` for normal arrivals) are
/// stored as `None`, which is also how an empty CSV cell reads back.  Rows are
/// not yet annotated: `run_number` is 0 and `assigned_route_at_start` is
/// `None` until [`RunStats::annotate`] is called.
pub fn merge(vehicles: &[VehicleRecord], trips: &[TripRecord]) -> StatsResult<RunStats> {
    let mut by_vehicle: HashMap<&str, &TripRecord> = HashMap::with_capacity(trips.len());
    for trip in trips {
        match by_vehicle.entry(trip.vehicle_id.as_str()) {
            Entry::Occupied(_) => return Err(StatsError::DuplicateTrip(trip.vehicle_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(trip);
            }
        }
    }

    let rows: Vec<RunStatsRow> = vehicles
        .iter()
        .map(|v| join_row(v, by_vehicle.get(v.vehicle_id.as_str()).copied()))
        .collect();

    log::debug!(
        "merged {} position rows with {} trip records",
        rows.len(),
        trips.len()
    );
    Ok(RunStats::new(rows))
}

fn join_row(v: &VehicleRecord, trip: Option<&TripRecord>) -> RunStatsRow {
    let field = |f: &dyn Fn(&TripRecord) -> &String| {
        trip.map(f).filter(|v| !v.is_empty()).cloned()
    };
    RunStatsRow {
        time:          v.time.clone(),
        car_id:        v.vehicle_id.clone(),
        depart:        field(&|t| &t.depart),
        edge_id:       v.edge_id.clone(),
        depart_lane:   field(&|t| &t.depart_lane),
        lane_id:       v.lane_id.clone(),
        arrival_lane:  field(&|t| &t.arrival_lane),
        depart_pos:    field(&|t| &t.depart_pos),
        pos:           v.pos.clone(),
        arrival_pos:   field(&|t| &t.arrival_pos),
        depart_speed:  field(&|t| &t.depart_speed),
        speed:         v.speed.clone(),
        arrival_speed: field(&|t| &t.arrival_speed),
        depart_delay:  field(&|t| &t.depart_delay),
        waiting_time:  field(&|t| &t.waiting_time),
        duration:      field(&|t| &t.duration),
        arrival:       field(&|t| &t.arrival),
        route_length:  field(&|t| &t.route_length),
        reroute_no:    field(&|t| &t.reroute_no),
        speed_factor:  field(&|t| &t.speed_factor),
        vaporized:     field(&|t| &t.vaporized),
        run_number:    0,
        assigned_route_at_start: None,
    }
}
