//! Plain record types produced by the parsers.

use std::collections::HashMap;

use co_core::{EdgeId, LaneId, VehicleId};

/// One vehicle observed at one timestep of the position dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    pub time:       String,
    pub vehicle_id: VehicleId,
    pub edge_id:    EdgeId,
    pub lane_id:    LaneId,
    /// Metres along the lane.
    pub pos:        String,
    /// m/s.
    pub speed:      String,
}

/// One completed (or vaporized) trip from the trip summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub vehicle_id:    VehicleId,
    pub depart:        String,
    pub depart_lane:   String,
    pub depart_pos:    String,
    pub depart_speed:  String,
    pub depart_delay:  String,
    pub arrival:       String,
    pub arrival_lane:  String,
    pub arrival_pos:   String,
    pub arrival_speed: String,
    pub duration:      String,
    pub route_length:  String,
    pub waiting_time:  String,
    pub reroute_no:    String,
    pub speed_factor:  String,
    /// Empty unless the simulator removed the vehicle before arrival.
    pub vaporized:     String,
}

/// Schema-less table: every attribute seen becomes a column.
///
/// Columns are ordered by first appearance.  Rows that lack a column read
/// back as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    columns: Vec<String>,
    lookup:  HashMap<String, usize>,
    rows:    Vec<Vec<Option<String>>>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row of `(column, value)` pairs, registering new columns.
    pub fn push_row(&mut self, pairs: impl IntoIterator<Item = (String, String)>) {
        let mut row = vec![None; self.columns.len()];
        for (column, value) in pairs {
            let idx = match self.lookup.get(&column) {
                Some(&i) => i,
                None => {
                    let i = self.columns.len();
                    self.lookup.insert(column.clone(), i);
                    self.columns.push(column);
                    row.push(None);
                    i
                }
            };
            row[idx] = Some(value);
        }
        self.rows.push(row);
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist and the row set it.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = *self.lookup.get(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Rows padded to the full column width, missing cells as `""`.
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        let width = self.columns.len();
        self.rows.iter().map(move |row| {
            (0..width)
                .map(|i| row.get(i).and_then(|v| v.as_deref()).unwrap_or(""))
                .collect()
        })
    }
}
