//! Edge-aggregate parser (plain traffic and emissions variants).
//!
//! Both variants share one shape:
//!
//! ```xml
//! <meandata>
//!     <interval begin="0.00" end="100.00" id="edgedata">
//!         <edge id="E0" sampledSeconds="41.00" density="3.12" speed="12.90"/>
//!     </interval>
//! </meandata>
//! ```
//!
//! The attribute set of `edge` differs between variants and simulator
//! versions, so nothing is interpreted: each edge becomes one row holding
//! `interval_begin`, `interval_end`, `interval_id` followed by its own
//! attributes verbatim.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};

use crate::xml::{ElementAttrs, reader};
use crate::{AttributeTable, ParseError, ParseResult};

const INTERVAL_KEYS: [&str; 3] = ["begin", "end", "id"];

fn open_interval(start: &BytesStart<'_>, position: u64) -> ParseResult<Vec<(String, String)>> {
    let attrs = ElementAttrs::read("interval", start, position)?;
    Ok(INTERVAL_KEYS
        .iter()
        .filter_map(|&k| attrs.optional(k).map(|v| (format!("interval_{k}"), v.to_owned())))
        .collect())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse an edge-aggregate document from any buffered source.
pub fn parse_edge_data_reader<R: BufRead>(source: R) -> ParseResult<AttributeTable> {
    let mut xml = reader(source);
    let mut buf = Vec::new();
    let mut table = AttributeTable::new();
    let mut interval: Option<Vec<(String, String)>> = None;

    loop {
        let position = xml.buffer_position() as u64;
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"interval" => {
                interval = Some(open_interval(&e, position)?);
            }
            Event::End(e) if e.name().as_ref() == b"interval" => interval = None,
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"edge" => {
                let attrs = ElementAttrs::read("edge", &e, position)?;
                let Some(prefix) = &interval else {
                    return Err(attrs.misplaced("interval"));
                };
                let mut row = prefix.clone();
                row.extend(attrs.pairs().iter().cloned());
                table.push_row(row);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("parsed {} edge aggregate rows", table.len());
    Ok(table)
}

/// Parse the edge-aggregate document at `path`.
pub fn parse_edge_data_file(path: &Path) -> ParseResult<AttributeTable> {
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_edge_data_reader(BufReader::new(file))
}
