//! Append-only run history plus the "latest" snapshot.
//!
//! `append_run` writes the immutable history copy first and only then swaps
//! in the new latest file (temp file + rename).  A crash between the two
//! leaves the previous latest untouched and the history one run ahead;
//! run numbering takes the higher of the two, so the next run skips the
//! orphaned number instead of colliding with it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use co_parse::AttributeTable;
use co_stats::RunStats;

use crate::csv::{read_run_stats, write_run_stats, write_table};
use crate::{OutputError, OutputResult};

const LATEST_FILE: &str = "simulationStats.csv";
const HISTORY_DIR: &str = "history";
const HISTORY_PREFIX: &str = "simulationStats_run";
const HISTORY_SUFFIX: &str = ".csv";

/// Raw passthrough exports kept next to the merged stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawExport {
    Dump,
    Tripinfo,
    EdgeData,
    Emissions,
}

impl RawExport {
    pub const ALL: [RawExport; 4] = [
        RawExport::Dump,
        RawExport::Tripinfo,
        RawExport::EdgeData,
        RawExport::Emissions,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            RawExport::Dump      => "dump.csv",
            RawExport::Tripinfo  => "tripinfo.csv",
            RawExport::EdgeData  => "edgedata.csv",
            RawExport::Emissions => "emissions.csv",
        }
    }
}

/// File-backed store rooted at the export directory.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Open (and create if needed) the export and history directories.
    pub fn open(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir.join(HISTORY_DIR))?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(LATEST_FILE)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.dir.join(HISTORY_DIR)
    }

    /// `history/simulationStats_run000012.csv` for run 12.
    pub fn history_path(&self, run_number: u32) -> PathBuf {
        self.history_dir()
            .join(format!("{HISTORY_PREFIX}{run_number:06}{HISTORY_SUFFIX}"))
    }

    pub fn raw_path(&self, export: RawExport) -> PathBuf {
        self.dir.join(export.file_name())
    }

    // ── Reading ───────────────────────────────────────────────────────────────

    /// The previous run's merged stats, or `None` before the first run.
    pub fn load_latest(&self) -> OutputResult<Option<RunStats>> {
        let path = self.latest_path();
        if !path.exists() {
            return Ok(None);
        }
        read_run_stats(&path).map(Some)
    }

    /// A recorded run from the history directory.
    pub fn load_run(&self, run_number: u32) -> OutputResult<RunStats> {
        read_run_stats(&self.history_path(run_number))
    }

    /// Run numbers present in the history directory, ascending.
    pub fn history_runs(&self) -> OutputResult<Vec<u32>> {
        Ok(self.history_entries()?.into_iter().map(|(n, _)| n).collect())
    }

    fn history_entries(&self) -> OutputResult<Vec<(u32, PathBuf)>> {
        let dir = self.history_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let number = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix(HISTORY_PREFIX))
                .and_then(|rest| rest.strip_suffix(HISTORY_SUFFIX))
                .and_then(|digits| digits.parse::<u32>().ok());
            if let Some(n) = number {
                entries.push((n, path));
            }
        }
        entries.sort_unstable_by_key(|(n, _)| *n);
        Ok(entries)
    }

    /// Number of the most recent run, if any run has been recorded.
    ///
    /// The larger of the latest file's `runNumber` column and the highest
    /// run in the history file names.  Either source may be missing.
    pub fn previous_run_number(&self) -> OutputResult<Option<u32>> {
        let from_latest = self.load_latest()?.and_then(|latest| latest.max_run_number());
        let from_history = self.history_runs()?.last().copied();
        Ok(from_latest.max(from_history))
    }

    /// Number to use for the next run: previous + 1, so a fresh store
    /// starts at run 1.
    pub fn next_run_number(&self) -> OutputResult<u32> {
        Ok(self.previous_run_number()?.unwrap_or(0) + 1)
    }

    // ── Writing ───────────────────────────────────────────────────────────────

    /// Record a finished run.
    ///
    /// Fails with [`OutputError::RunExists`] if the run number is already in
    /// the history; nothing is written in that case.
    pub fn append_run(&self, run_number: u32, stats: &RunStats) -> OutputResult<()> {
        let history = self.history_path(run_number);
        if history.exists() {
            return Err(OutputError::RunExists { run: run_number, path: history });
        }
        fs::create_dir_all(self.history_dir())?;
        write_run_stats(&history, stats)?;

        let latest = self.latest_path();
        let tmp = latest.with_extension("csv.tmp");
        write_run_stats(&tmp, stats)?;
        fs::rename(&tmp, &latest)?;

        info!("recorded run {run_number}: {} rows -> {}", stats.len(), history.display());
        Ok(())
    }

    /// Overwrite one raw passthrough export.
    pub fn write_raw(&self, export: RawExport, table: &AttributeTable) -> OutputResult<PathBuf> {
        let path = self.raw_path(export);
        write_table(&path, table)?;
        debug!("wrote {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    /// Remove the latest snapshot and raw exports, returning what was
    /// deleted.  History survives unless `purge_history` is set.
    pub fn reset(&self, purge_history: bool) -> OutputResult<Vec<PathBuf>> {
        let mut removed = Vec::new();
        let mut targets = vec![self.latest_path()];
        targets.extend(RawExport::ALL.iter().map(|e| self.raw_path(*e)));
        for path in targets {
            if path.exists() {
                fs::remove_file(&path)?;
                removed.push(path);
            }
        }

        if purge_history {
            for (_, path) in self.history_entries()? {
                fs::remove_file(&path)?;
                removed.push(path);
            }
        }
        Ok(removed)
    }
}
