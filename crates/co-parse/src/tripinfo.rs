//! Trip-summary parser.
//!
//! # Input format
//!
//! ```xml
//! <tripinfos>
//!     <tripinfo id="car0" depart="0.00" departLane="E0_1" departPos="0.00"
//!               departSpeed="0.00" departDelay="0.00" arrival="61.00"
//!               arrivalLane="E7_1" arrivalPos="95.60" arrivalSpeed="13.31"
//!               duration="61.00" routeLength="395.60" waitingTime="0.00"
//!               waitingCount="0" stopTime="0.00" timeLoss="12.48"
//!               rerouteNo="0" devices="tripinfo_car0" vType="car"
//!               speedFactor="1.03" vaporized=""/>
//! </tripinfos>
//! ```
//!
//! `tripinfo` elements may carry children (e.g. `emissions`); those are not
//! trip entries and are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;

use co_core::VehicleId;

use crate::xml::{ElementAttrs, reader};
use crate::{AttributeTable, ParseError, ParseResult, TripRecord};

/// Everything extracted from one trip summary.
#[derive(Debug, Clone, Default)]
pub struct TripDocument {
    pub records: Vec<TripRecord>,
    /// Every `tripinfo` attribute verbatim, for the raw CSV export.
    pub raw:     AttributeTable,
}

fn trip_record(attrs: &ElementAttrs) -> ParseResult<TripRecord> {
    Ok(TripRecord {
        vehicle_id:    VehicleId(attrs.required("id")?),
        depart:        attrs.required("depart")?,
        depart_lane:   attrs.required("departLane")?,
        depart_pos:    attrs.required("departPos")?,
        depart_speed:  attrs.required("departSpeed")?,
        depart_delay:  attrs.required("departDelay")?,
        arrival:       attrs.required("arrival")?,
        arrival_lane:  attrs.required("arrivalLane")?,
        arrival_pos:   attrs.required("arrivalPos")?,
        arrival_speed: attrs.required("arrivalSpeed")?,
        duration:      attrs.required("duration")?,
        route_length:  attrs.required("routeLength")?,
        waiting_time:  attrs.required("waitingTime")?,
        reroute_no:    attrs.required("rerouteNo")?,
        speed_factor:  attrs.required("speedFactor")?,
        vaporized:     attrs.required("vaporized")?,
    })
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a trip summary from any buffered source.
pub fn parse_tripinfo_reader<R: BufRead>(source: R) -> ParseResult<TripDocument> {
    let mut xml = reader(source);
    let mut buf = Vec::new();
    let mut doc = TripDocument::default();

    loop {
        let position = xml.buffer_position() as u64;
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"tripinfo" => {
                let attrs = ElementAttrs::read("tripinfo", &e, position)?;
                doc.records.push(trip_record(&attrs)?);
                doc.raw.push_row(attrs.into_pairs());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("parsed {} trip records from trip summary", doc.records.len());
    Ok(doc)
}

/// Parse the trip summary at `path`.
pub fn parse_tripinfo_file(path: &Path) -> ParseResult<TripDocument> {
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tripinfo_reader(BufReader::new(file))
}
