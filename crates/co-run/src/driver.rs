//! The `Driver` struct and its run sequence.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use co_core::{ExperimentConfig, RouteRegistry, RouteRng};
use co_output::{HistoryStore, RawExport};
use co_parse::{parse_dump_file, parse_edge_data_file, parse_tripinfo_file};
use co_plan::{CarryoverPlan, ControlDocument, Planner, render, render_bootstrap};
use co_stats::merge;

use crate::{RunObserver, RunRequest, RunResult, Simulator};

const ROUTES_FILE: &str = "carryover.rou.xml";
const DUMP_FILE: &str = "netstate.xml";
const TRIPINFO_FILE: &str = "tripinfo.xml";

/// Control input decided for the next run, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub run_number: u32,
    /// `true` when no previous snapshot existed and the bootstrap
    /// assignment was used.
    pub bootstrap:  bool,
    pub plan:       CarryoverPlan,
    pub document:   ControlDocument,
}

/// Outcome of one recorded run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_number: u32,
    pub bootstrap:  bool,
    pub vehicles:   usize,
    pub continuing: usize,
    pub restarting: usize,
    /// Rows in the merged statistics table.
    pub rows:       usize,
    pub history:    PathBuf,
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Sequences one run at a time:
///
/// 1. **Load** the latest snapshot and derive the run number.
/// 2. **Plan**: bootstrap assignment on the first run, carryover after.
/// 3. **Render** the control input into the work directory.
/// 4. **Simulate** (blocking) via the [`Simulator`].
/// 5. **Parse** every output; any malformed file stops the run here.
/// 6. **Merge** and annotate with the run number and starting routes.
/// 7. **Persist**: history copy, latest snapshot, raw exports.
///
/// A run that fails before step 7 leaves the export directory untouched.
///
/// Create via [`DriverBuilder`][crate::DriverBuilder].
pub struct Driver<S: Simulator> {
    pub config:    ExperimentConfig,
    pub registry:  RouteRegistry,
    pub store:     HistoryStore,
    pub work_dir:  PathBuf,
    pub simulator: S,
}

impl<S: Simulator> Driver<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Decide the next run's control input without writing anything.
    pub fn plan_next(&self) -> RunResult<PreparedRun> {
        let run_number = self.store.next_run_number()?;
        let fleet = &self.config.fleet;
        let vehicle_type = &self.config.vehicle_type;

        let Some(previous) = self.store.load_latest()? else {
            let route = &self.config.bootstrap.route;
            info!("run {run_number}: no previous snapshot, every vehicle starts on {route}");
            let (plan, document) = render_bootstrap(&self.registry, fleet, route, vehicle_type)?;
            return Ok(PreparedRun { run_number, bootstrap: true, plan, document });
        };

        let mut rng = RouteRng::for_run(self.config.seed, run_number);
        let plan = Planner::new(&self.registry, fleet)
            .on_invalid_state(self.config.on_invalid_state)
            .plan_from_snapshot(&previous, &mut rng)?;
        let document = render(&self.registry, &plan, vehicle_type);
        Ok(PreparedRun { run_number, bootstrap: false, plan, document })
    }

    /// Execute and record exactly one run.
    pub fn run_once<O: RunObserver>(&mut self, observer: &mut O) -> RunResult<RunSummary> {
        let prepared = self.plan_next()?;
        let run_number = prepared.run_number;
        observer.on_plan_ready(run_number, &prepared.plan);

        let request = self.request(run_number);
        for stale in request.outputs() {
            remove_if_present(stale)?;
        }
        prepared.document.write_to(&request.route_file)?;

        let artifacts = self.simulator.run(&request)?;
        artifacts.ensure_present()?;
        observer.on_simulator_finished(run_number, &artifacts);

        // Parse everything before the export directory is touched.
        let dump = parse_dump_file(&artifacts.dump)?;
        let trips = parse_tripinfo_file(&artifacts.tripinfo)?;
        let edge_data = artifacts.edge_data.as_deref().map(parse_edge_data_file).transpose()?;
        let emissions = artifacts.emissions.as_deref().map(parse_edge_data_file).transpose()?;

        let mut stats = merge(&dump.records, &trips.records)?;
        stats.annotate(run_number, &prepared.plan.assignments());

        self.store.append_run(run_number, &stats)?;
        self.store.write_raw(RawExport::Dump, &dump.raw)?;
        self.store.write_raw(RawExport::Tripinfo, &trips.raw)?;
        if let Some(table) = &edge_data {
            self.store.write_raw(RawExport::EdgeData, table)?;
        }
        if let Some(table) = &emissions {
            self.store.write_raw(RawExport::Emissions, table)?;
        }

        let summary = RunSummary {
            run_number,
            bootstrap:  prepared.bootstrap,
            vehicles:   prepared.plan.len(),
            continuing: prepared.plan.continuing(),
            restarting: prepared.plan.restarting(),
            rows:       stats.len(),
            history:    self.store.history_path(run_number),
        };
        observer.on_run_recorded(&summary);
        Ok(summary)
    }

    /// Execute `n` runs back to back, stopping at the first failure.
    pub fn run_many<O: RunObserver>(&mut self, n: usize, observer: &mut O) -> RunResult<Vec<RunSummary>> {
        let mut summaries = Vec::with_capacity(n);
        for _ in 0..n {
            summaries.push(self.run_once(observer)?);
        }
        Ok(summaries)
    }

    /// Return the experiment to its initial state.
    ///
    /// Removes the latest snapshot, raw exports and every generated file in
    /// the work directory.  History is kept unless `purge_history` is set.
    pub fn reset(&self, purge_history: bool) -> RunResult<Vec<PathBuf>> {
        let mut removed = self.store.reset(purge_history)?;
        let request = self.request(0);
        let mut generated = vec![request.route_file.clone()];
        generated.extend(request.outputs().into_iter().cloned());
        for path in generated {
            if remove_if_present(&path)? {
                removed.push(path);
            }
        }
        info!("reset removed {} files", removed.len());
        Ok(removed)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn request(&self, run_number: u32) -> RunRequest {
        let sim = &self.config.simulator;
        RunRequest {
            run_number,
            work_dir:   self.work_dir.clone(),
            route_file: self.work_dir.join(ROUTES_FILE),
            steps:      self.config.steps,
            dump:       self.work_dir.join(DUMP_FILE),
            tripinfo:   self.work_dir.join(TRIPINFO_FILE),
            edge_data:  sim.edge_data.as_ref().map(|p| self.work_dir.join(p)),
            emissions:  sim.emissions.as_ref().map(|p| self.work_dir.join(p)),
        }
    }
}

/// `Ok(true)` if the file existed and was removed.
fn remove_if_present(path: &Path) -> RunResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
