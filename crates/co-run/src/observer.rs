//! Run observer trait for progress reporting.

use co_plan::CarryoverPlan;

use crate::{RunArtifacts, RunSummary};

/// Callbacks invoked by [`Driver::run_once`][crate::Driver::run_once] at the
/// boundaries between run phases.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — summary printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl RunObserver for Printer {
///     fn on_run_recorded(&mut self, summary: &RunSummary) {
///         println!("run {}: {} rows", summary.run_number, summary.rows);
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once the control input is decided, before anything is written.
    fn on_plan_ready(&mut self, _run_number: u32, _plan: &CarryoverPlan) {}

    /// Called after the simulator returned and its outputs were found.
    fn on_simulator_finished(&mut self, _run_number: u32, _artifacts: &RunArtifacts) {}

    /// Called after the run is in the history store.
    fn on_run_recorded(&mut self, _summary: &RunSummary) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
