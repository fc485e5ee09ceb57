//! `co-parse` — converts simulator XML output into tabular records.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`records`]   | `VehicleRecord`, `TripRecord`, `AttributeTable`           |
//! | [`dump`]      | `parse_dump_reader`, `parse_dump_file`                    |
//! | [`tripinfo`]  | `parse_tripinfo_reader`, `parse_tripinfo_file`            |
//! | [`edgedata`]  | `parse_edge_data_reader`, `parse_edge_data_file`          |
//! | [`error`]     | `ParseError`, `ParseResult<T>`                            |
//!
//! # Text fidelity
//!
//! Numeric attributes (`time`, `pos`, `speed`, …) are kept exactly as the
//! simulator wrote them.  `"45.20"` stays `"45.20"` all the way into the
//! history CSVs; conversion to a number happens only where arithmetic needs
//! it (e.g. finding the last timestep).
//!
//! # Strictness
//!
//! A `vehicle` or `tripinfo` element missing a required attribute aborts the
//! parse with [`ParseError::MissingAttribute`].  Nothing is skipped, so a
//! malformed run never reaches the history store.

pub mod dump;
pub mod edgedata;
pub mod error;
pub mod records;
pub mod tripinfo;

mod xml;


pub use dump::{DumpDocument, parse_dump_file, parse_dump_reader};
pub use edgedata::{parse_edge_data_file, parse_edge_data_reader};
pub use error::{ParseError, ParseResult};
pub use records::{AttributeTable, TripRecord, VehicleRecord};
pub use tripinfo::{TripDocument, parse_tripinfo_file, parse_tripinfo_reader};
