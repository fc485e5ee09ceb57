//! `co-output` — CSV exports and the run history store.
//!
//! Files in the export directory:
//!
//! | File                                   | Contents                                  |
//! |----------------------------------------|-------------------------------------------|
//! | `simulationStats.csv`                  | latest merged stats (overwritten per run) |
//! | `history/simulationStats_runNNNNNN.csv`| immutable copy per run                    |
//! | `dump.csv`, `tripinfo.csv`             | raw passthrough of the last run's output  |
//! | `edgedata.csv`, `emissions.csv`        | raw edge aggregates, when configured      |
//!
//! Every CSV quotes all fields.
//!
//! # Usage
//!
//! ```rust,ignore
//! use co_output::HistoryStore;
//!
//! let store = HistoryStore::open(Path::new("csv"))?;
//! let run = store.next_run_number()?;
//! store.append_run(run, &stats)?;
//! ```

pub mod csv;
pub mod error;
pub mod history;


pub use crate::csv::{read_run_stats, write_run_stats, write_table};
pub use error::{OutputError, OutputResult};
pub use history::{HistoryStore, RawExport};
