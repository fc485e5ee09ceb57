//! CSV read/write for merged stats and passthrough tables.

use std::fs::File;
use std::path::Path;

use csv::{QuoteStyle, Reader, Writer, WriterBuilder};

use co_parse::AttributeTable;
use co_stats::{COLUMNS, RunStats, RunStatsRow};

use crate::{OutputError, OutputResult};

fn quoted_writer(path: &Path) -> OutputResult<Writer<File>> {
    Ok(WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .has_headers(false)
        .from_path(path)?)
}

/// Write `stats` with the fixed header, even when there are no rows.
pub fn write_run_stats(path: &Path, stats: &RunStats) -> OutputResult<()> {
    let mut w = quoted_writer(path)?;
    w.write_record(COLUMNS)?;
    for row in &stats.rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Read a merged-stats CSV, rejecting files with a different header.
pub fn read_run_stats(path: &Path) -> OutputResult<RunStats> {
    let mut rdr = Reader::from_path(path)?;
    let headers = rdr.headers()?;
    if !headers.iter().eq(COLUMNS.iter().copied()) {
        return Err(OutputError::Schema {
            path:  path.to_path_buf(),
            found: headers.iter().map(str::to_owned).collect(),
        });
    }

    let rows = rdr
        .deserialize::<RunStatsRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RunStats::new(rows))
}

/// Write a passthrough table: header = first-seen columns.
pub fn write_table(path: &Path, table: &AttributeTable) -> OutputResult<()> {
    let mut w = quoted_writer(path)?;
    if !table.columns().is_empty() {
        w.write_record(table.columns())?;
    }
    for record in table.records() {
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}
