//! Position-dump parser.
//!
//! # Input format
//!
//! ```xml
//! <netstate>
//!     <timestep time="0.00">
//!         <edge id="E0">
//!             <lane id="E0_1">
//!                 <vehicle id="car0" pos="5.10" speed="0.00"/>
//!             </lane>
//!         </edge>
//!     </timestep>
//! </netstate>
//! ```
//!
//! Records come out in document order: time ascending, vehicles in the order
//! the simulator emitted them.  Elements other than `timestep`, `edge`,
//! `lane` and `vehicle` (e.g. `person`) are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};

use co_core::{EdgeId, LaneId, VehicleId};

use crate::xml::{ElementAttrs, reader};
use crate::{AttributeTable, ParseError, ParseResult, VehicleRecord};

/// Everything extracted from one position dump.
#[derive(Debug, Clone, Default)]
pub struct DumpDocument {
    /// One record per (vehicle, timestep) pair.
    pub records: Vec<VehicleRecord>,
    /// Flattened passthrough of the same rows for the raw CSV export:
    /// `timestep_time`, `edge_id`, `lane_id`, then every vehicle attribute
    /// prefixed with `vehicle_`.
    pub raw:     AttributeTable,
}

/// Where the reader currently is in the `timestep/edge/lane` nesting.
#[derive(Default)]
struct Cursor {
    time: Option<String>,
    edge: Option<EdgeId>,
    lane: Option<LaneId>,
}

impl Cursor {
    fn open(&mut self, start: &BytesStart<'_>, position: u64, doc: &mut DumpDocument) -> ParseResult<()> {
        match start.name().as_ref() {
            b"timestep" => {
                let attrs = ElementAttrs::read("timestep", start, position)?;
                self.time = Some(attrs.required("time")?);
            }
            b"edge" => {
                let attrs = ElementAttrs::read("edge", start, position)?;
                self.edge = Some(EdgeId(attrs.required("id")?));
            }
            b"lane" => {
                let attrs = ElementAttrs::read("lane", start, position)?;
                self.lane = Some(LaneId(attrs.required("id")?));
            }
            b"vehicle" => {
                let attrs = ElementAttrs::read("vehicle", start, position)?;
                let (Some(time), Some(edge), Some(lane)) = (&self.time, &self.edge, &self.lane) else {
                    return Err(attrs.misplaced("timestep/edge/lane"));
                };
                let record = VehicleRecord {
                    time:       time.clone(),
                    vehicle_id: VehicleId(attrs.required("id")?),
                    edge_id:    edge.clone(),
                    lane_id:    lane.clone(),
                    pos:        attrs.required("pos")?,
                    speed:      attrs.required("speed")?,
                };

                let mut raw = vec![
                    ("timestep_time".to_owned(), time.clone()),
                    ("edge_id".to_owned(), edge.0.clone()),
                    ("lane_id".to_owned(), lane.0.clone()),
                ];
                raw.extend(
                    attrs
                        .into_pairs()
                        .into_iter()
                        .map(|(k, v)| (format!("vehicle_{k}"), v)),
                );
                doc.raw.push_row(raw);
                doc.records.push(record);
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"timestep" => {
                self.time = None;
                self.edge = None;
                self.lane = None;
            }
            b"edge" => {
                self.edge = None;
                self.lane = None;
            }
            b"lane" => self.lane = None,
            _ => {}
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a position dump from any buffered source.
pub fn parse_dump_reader<R: BufRead>(source: R) -> ParseResult<DumpDocument> {
    let mut xml = reader(source);
    let mut buf = Vec::new();
    let mut cursor = Cursor::default();
    let mut doc = DumpDocument::default();

    loop {
        let position = xml.buffer_position() as u64;
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => cursor.open(&e, position, &mut doc)?,
            Event::Empty(e) => {
                cursor.open(&e, position, &mut doc)?;
                cursor.close(e.name().as_ref());
            }
            Event::End(e) => cursor.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("parsed {} vehicle records from position dump", doc.records.len());
    Ok(doc)
}

/// Parse the position dump at `path`.
pub fn parse_dump_file(path: &Path) -> ParseResult<DumpDocument> {
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dump_reader(BufReader::new(file))
}
