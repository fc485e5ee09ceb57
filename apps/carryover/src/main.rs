//! carryover — repeated simulator runs with vehicle state carried between
//! them.
//!
//! ```text
//! carryover run   --config carryover.toml --runs 5
//! carryover plan  --config carryover.toml
//! carryover reset --config carryover.toml [--purge-history]
//! ```
//!
//! Set `RUST_LOG=info` (or `debug` for per-vehicle decisions) to see the
//! library logs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use co_core::ExperimentConfig;
use co_plan::{CarryoverPlan, Decision};
use co_run::{Driver, DriverBuilder, RunObserver, RunSummary, SumoProcess};

/// Run a traffic simulation repeatedly, resuming surviving vehicles.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    op: Operation,
}

#[derive(Debug, Clone, Subcommand)]
enum Operation {
    /// execute one or more runs and record them in the history
    Run {
        /// experiment configuration (TOML)
        #[arg(short, long, default_value = "carryover.toml")]
        config: PathBuf,

        /// number of consecutive runs
        #[arg(short, long, default_value_t = 1)]
        runs: usize,
    },
    /// print the control input the next run would use, without running it
    Plan {
        #[arg(short, long, default_value = "carryover.toml")]
        config: PathBuf,
    },
    /// delete the latest snapshot, raw exports and generated work files
    Reset {
        #[arg(short, long, default_value = "carryover.toml")]
        config: PathBuf,

        /// also delete every recorded run in the history directory
        #[arg(long)]
        purge_history: bool,
    },
}

// ── Progress output ───────────────────────────────────────────────────────────

struct Progress {
    started: Instant,
}

impl RunObserver for Progress {
    fn on_plan_ready(&mut self, run_number: u32, plan: &CarryoverPlan) {
        self.started = Instant::now();
        println!(
            "run {run_number}: {} vehicles ({} continuing, {} restarting)",
            plan.len(),
            plan.continuing(),
            plan.restarting()
        );
    }

    fn on_run_recorded(&mut self, summary: &RunSummary) {
        println!(
            "run {}: {} rows recorded in {:.2} s -> {}",
            summary.run_number,
            summary.rows,
            self.started.elapsed().as_secs_f64(),
            summary.history.display()
        );
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn driver(config_path: &Path) -> Result<Driver<SumoProcess>> {
    let config = ExperimentConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let sumo = SumoProcess::new(config.simulator.clone());
    Ok(DriverBuilder::new(config, sumo).build()?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.op {
        Operation::Run { config, runs } => {
            let mut driver = driver(&config)?;
            let mut progress = Progress { started: Instant::now() };
            let t0 = Instant::now();
            let summaries = driver.run_many(runs, &mut progress)?;

            println!();
            println!("{:<6} {:<10} {:<11} {:<11} {:<8}", "Run", "Vehicles", "Continuing", "Restarting", "Rows");
            println!("{}", "-".repeat(50));
            for s in &summaries {
                println!(
                    "{:<6} {:<10} {:<11} {:<11} {:<8}",
                    s.run_number, s.vehicles, s.continuing, s.restarting, s.rows
                );
            }
            println!();
            println!("{} run(s) complete in {:.2} s", summaries.len(), t0.elapsed().as_secs_f64());
            println!("Latest snapshot: {}", driver.store.latest_path().display());
        }

        Operation::Plan { config } => {
            let driver = driver(&config)?;
            let prepared = driver.plan_next()?;
            let mode = if prepared.bootstrap { "bootstrap" } else { "carryover" };
            log::info!("next run is {} ({mode})", prepared.run_number);
            for entry in prepared.plan.entries() {
                let what = match &entry.decision {
                    Decision::Continue(s) => format!("continue at edge {} lane {} pos {}", s.edge_index, s.lane, s.pos),
                    Decision::Restart     => "restart".to_owned(),
                };
                eprintln!("{:<8} {:<10} {what}", entry.vehicle, entry.route);
            }
            print!("{}", prepared.document.to_xml()?);
        }

        Operation::Reset { config, purge_history } => {
            let driver = driver(&config)?;
            let removed = driver.reset(purge_history)?;
            for path in &removed {
                println!("removed {}", path.display());
            }
            println!("{} file(s) removed", removed.len());
        }
    }

    Ok(())
}
