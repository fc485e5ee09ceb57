//! Unit tests for co-run.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use tempfile::{TempDir, tempdir};

use co_core::ExperimentConfig;
use co_output::RawExport;
use co_plan::{CarryoverPlan, Decision, PlanError};

use crate::{
    Driver, DriverBuilder, NoopObserver, RunArtifacts, RunError, RunObserver, RunRequest,
    RunResult, RunSummary, Simulator, SumoProcess,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const CONFIG: &str = r#"
steps = 100

[fleet]
size = 3

[bootstrap]
route = "route0"

[[routes]]
id    = "route0"
edges = ["E0", "E12", "E4", "E7"]

[[routes]]
id    = "route1"
edges = ["-E7", "-E4", "-E12", "-E0"]

[simulator]
config_file = "straight.sumocfg"
"#;

/// car0 and car1 still driving at 99.00; car2 finished at 98.00.
const DUMP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<netstate>
    <timestep time="98.00">
        <edge id="E0">
            <lane id="E0_0">
                <vehicle id="car0" pos="40.00" speed="11.00"/>
                <vehicle id="car1" pos="2.00" speed="5.00"/>
            </lane>
        </edge>
        <edge id="E7">
            <lane id="E7_0">
                <vehicle id="car2" pos="90.00" speed="13.00"/>
            </lane>
        </edge>
    </timestep>
    <timestep time="99.00">
        <edge id="E12">
            <lane id="E12_1">
                <vehicle id="car0" pos="45.2" speed="12.0"/>
            </lane>
        </edge>
        <edge id="E4">
            <lane id="E4_0">
                <vehicle id="car1" pos="10.00" speed="8.00"/>
            </lane>
        </edge>
    </timestep>
</netstate>
"#;

const TRIPINFO_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tripinfos>
    <tripinfo id="car2" depart="0.00" departLane="E0_0" departPos="0.00" departSpeed="0.00"
              departDelay="0.00" arrival="98.00" arrivalLane="E7_0" arrivalPos="95.60"
              arrivalSpeed="13.00" duration="98.00" routeLength="395.60" waitingTime="0.00"
              rerouteNo="0" speedFactor="1.00" vaporized=""/>
</tripinfos>
"#;

/// The dump ends with empty timesteps: car2 was last seen at 97.00 and
/// arrived at 98.00, after which nothing was on the network.
const TRAILING_EMPTY_DUMP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<netstate>
    <timestep time="97.00">
        <edge id="E12">
            <lane id="E12_1">
                <vehicle id="car0" pos="45.2" speed="12.0"/>
            </lane>
        </edge>
        <edge id="E7">
            <lane id="E7_0">
                <vehicle id="car2" pos="90.00" speed="13.00"/>
            </lane>
        </edge>
    </timestep>
    <timestep time="98.00"/>
    <timestep time="99.00"/>
</netstate>
"#;

const EDGE_XML: &str = r#"<meandata>
    <interval begin="0.00" end="100.00" id="edgedata">
        <edge id="E0" sampledSeconds="41.00" speed="12.90"/>
    </interval>
</meandata>
"#;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Writes canned output files instead of running a real simulator.
///
/// Each queued entry is one run's `(dump, tripinfo)`.  With the queue empty
/// it writes nothing, which the driver must treat as a missing output.
#[derive(Default)]
struct ScriptedSimulator {
    script:   VecDeque<(String, String)>,
    edges:    Option<&'static str>,
    requests: Vec<RunRequest>,
    controls: Vec<String>,
}

impl ScriptedSimulator {
    fn with_runs(n: usize) -> Self {
        Self {
            script: (0..n).map(|_| (DUMP_XML.to_owned(), TRIPINFO_XML.to_owned())).collect(),
            ..Self::default()
        }
    }

    fn push(&mut self, dump: String) {
        self.script.push_back((dump, TRIPINFO_XML.to_owned()));
    }
}

impl Simulator for ScriptedSimulator {
    fn run(&mut self, request: &RunRequest) -> RunResult<RunArtifacts> {
        self.controls.push(fs::read_to_string(&request.route_file)?);
        self.requests.push(request.clone());
        if let Some((dump, trips)) = self.script.pop_front() {
            fs::write(&request.dump, dump)?;
            fs::write(&request.tripinfo, trips)?;
            for path in [&request.edge_data, &request.emissions].into_iter().flatten() {
                fs::write(path, self.edges.unwrap_or(EDGE_XML))?;
            }
        }
        Ok(RunArtifacts::expected(request))
    }
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl RunObserver for Recorder {
    fn on_plan_ready(&mut self, run_number: u32, plan: &CarryoverPlan) {
        self.events.push(format!("plan {run_number} ({} vehicles)", plan.len()));
    }

    fn on_simulator_finished(&mut self, run_number: u32, _artifacts: &RunArtifacts) {
        self.events.push(format!("simulated {run_number}"));
    }

    fn on_run_recorded(&mut self, summary: &RunSummary) {
        self.events.push(format!("recorded {}", summary.run_number));
    }
}

fn config(extra: &str) -> ExperimentConfig {
    ExperimentConfig::from_toml_str(&format!("{CONFIG}{extra}")).unwrap()
}

fn driver(dir: &TempDir, config: ExperimentConfig, sim: ScriptedSimulator) -> Driver<ScriptedSimulator> {
    DriverBuilder::new(config, sim)
        .work_dir(dir.path().join("work"))
        .export_dir(dir.path().join("csv"))
        .build()
        .unwrap()
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}

#[cfg(test)]
mod runs {
    use super::*;

    #[test]
    fn first_run_bootstraps_on_default_route() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        let summary = d.run_once(&mut NoopObserver).unwrap();

        assert_eq!(summary.run_number, 1);
        assert!(summary.bootstrap);
        assert_eq!(summary.vehicles, 3);
        assert_eq!(summary.rows, 5);
        assert!(exists(&summary.history));

        let control = &d.simulator.controls[0];
        for car in ["car0", "car1", "car2"] {
            let line = format!(
                r#"<vehicle id="{car}" type="car" route="route0" depart="0" departPos="0.00"/>"#
            );
            assert!(control.contains(&line), "{line} missing from\n{control}");
        }
    }

    #[test]
    fn rows_are_annotated_with_run_and_start_route() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        let latest = d.store.load_latest().unwrap().unwrap();
        assert!(latest.rows.iter().all(|r| r.run_number == 1));
        assert!(latest.rows.iter().all(|r| r.assigned_route_at_start.as_ref().unwrap().as_str() == "route0"));
        let car2 = latest.rows.iter().find(|r| r.car_id.as_str() == "car2").unwrap();
        assert_eq!(car2.arrival.as_deref(), Some("98.00"));
        let car0 = latest.rows.iter().find(|r| r.car_id.as_str() == "car0").unwrap();
        assert_eq!(car0.arrival, None);
    }

    #[test]
    fn second_run_carries_survivors_over() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(2));
        d.run_once(&mut NoopObserver).unwrap();
        let summary = d.run_once(&mut NoopObserver).unwrap();

        assert_eq!(summary.run_number, 2);
        assert!(!summary.bootstrap);
        assert_eq!((summary.continuing, summary.restarting), (2, 1));

        let control = &d.simulator.controls[1];
        assert!(control.contains(
            r#"<vehicle id="car0" type="car" route="route0" depart="0" departLane="1" departEdge="1" departPos="45.2" departSpeed="12.0"/>"#
        ));
        assert!(control.contains(
            r#"<vehicle id="car1" type="car" route="route0" depart="0" departLane="0" departEdge="2" departPos="10.00" departSpeed="8.00"/>"#
        ));
        let restarted = control.lines().find(|l| l.contains(r#"id="car2""#)).unwrap();
        assert!(restarted.ends_with(r#"depart="0" departPos="0.00"/>"#));
        assert!(!restarted.contains("departEdge"));

        assert_eq!(d.store.history_runs().unwrap(), [1, 2]);
        assert_eq!(d.store.load_latest().unwrap().unwrap().max_run_number(), Some(2));
    }

    #[test]
    fn arrived_vehicle_restarts_despite_trailing_empty_timesteps() {
        let dir = tempdir().unwrap();
        let mut sim = ScriptedSimulator::default();
        sim.push(TRAILING_EMPTY_DUMP_XML.to_owned());
        let mut d = driver(&dir, config(""), sim);
        d.run_once(&mut NoopObserver).unwrap();

        let prepared = d.plan_next().unwrap();
        let car0 = prepared.plan.get("car0").unwrap().resume().unwrap();
        assert_eq!((car0.edge_index, car0.lane.as_str()), (1, "1"));
        assert_eq!(prepared.plan.get("car1").unwrap().decision, Decision::Restart);
        assert_eq!(prepared.plan.get("car2").unwrap().decision, Decision::Restart);
    }

    #[test]
    fn simulator_receives_configured_steps_and_paths() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        let request = &d.simulator.requests[0];
        assert_eq!(request.steps, 100);
        assert_eq!(request.run_number, 1);
        assert!(request.route_file.starts_with(dir.path().join("work")));
        assert_eq!(request.edge_data, None);
    }

    #[test]
    fn run_many_numbers_runs_consecutively() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(3));
        let mut recorder = Recorder::default();
        let summaries = d.run_many(3, &mut recorder).unwrap();

        let numbers: Vec<u32> = summaries.iter().map(|s| s.run_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(recorder.events[..3], ["plan 1 (3 vehicles)", "simulated 1", "recorded 1"]);
        assert_eq!(recorder.events.len(), 9);
    }

    #[test]
    fn edge_aggregates_exported_when_configured() {
        let dir = tempdir().unwrap();
        let cfg = config("edge_data = \"edgedata.xml\"\n");
        let mut d = driver(&dir, cfg, ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        let exported = fs::read_to_string(d.store.raw_path(RawExport::EdgeData)).unwrap();
        assert!(exported.starts_with(r#""interval_begin","interval_end","interval_id","id""#));
        assert!(exists(&d.store.raw_path(RawExport::Dump)));
        assert!(exists(&d.store.raw_path(RawExport::Tripinfo)));
        assert!(!exists(&d.store.raw_path(RawExport::Emissions)));
    }
}

#[cfg(test)]
mod failures {
    use super::*;

    #[test]
    fn missing_output_records_nothing() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::default());
        let err = d.run_once(&mut NoopObserver).unwrap_err();

        assert!(matches!(err, RunError::MissingOutput(_)));
        assert!(d.store.history_runs().unwrap().is_empty());
        assert!(d.store.load_latest().unwrap().is_none());
    }

    #[test]
    fn stale_outputs_do_not_count_as_produced() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        let err = d.run_once(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, RunError::MissingOutput(_)));
        assert_eq!(d.store.history_runs().unwrap(), [1]);
    }

    #[test]
    fn malformed_dump_leaves_latest_untouched() {
        let dir = tempdir().unwrap();
        let mut sim = ScriptedSimulator::with_runs(1);
        sim.push(DUMP_XML.replace(r#" speed="8.00""#, ""));
        let mut d = driver(&dir, config(""), sim);
        d.run_once(&mut NoopObserver).unwrap();
        let before = fs::read_to_string(d.store.latest_path()).unwrap();

        let err = d.run_once(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, RunError::Parse(_)));
        assert_eq!(fs::read_to_string(d.store.latest_path()).unwrap(), before);
        assert_eq!(d.store.history_runs().unwrap(), [1]);
    }

    #[test]
    fn history_ahead_of_latest_does_not_block_later_runs() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(3));
        d.run_once(&mut NoopObserver).unwrap();
        // run 2 reached history but latest was never replaced
        fs::copy(d.store.latest_path(), d.store.history_path(2)).unwrap();

        let third = d.run_once(&mut NoopObserver).unwrap();
        let fourth = d.run_once(&mut NoopObserver).unwrap();
        assert_eq!((third.run_number, fourth.run_number), (3, 4));
        assert_eq!(d.store.history_runs().unwrap(), [1, 2, 3, 4]);
        assert_eq!(d.store.load_latest().unwrap().unwrap().max_run_number(), Some(4));
    }

    #[test]
    fn invalid_carryover_aborts_before_simulator() {
        let dir = tempdir().unwrap();
        let mut sim = ScriptedSimulator::default();
        sim.push(DUMP_XML.replace(r#"<edge id="E12">"#, r#"<edge id="E99">"#));
        let mut d = driver(&dir, config(""), sim);
        d.run_once(&mut NoopObserver).unwrap();

        let err = d.run_once(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, RunError::Plan(PlanError::InvalidCarryoverState { .. })));
        assert_eq!(d.simulator.requests.len(), 1);
    }

    #[test]
    fn restart_policy_demotes_invalid_vehicle() {
        let dir = tempdir().unwrap();
        let mut sim = ScriptedSimulator::default();
        sim.push(DUMP_XML.replace(r#"<edge id="E12">"#, r#"<edge id="E99">"#));
        sim.push(DUMP_XML.to_owned());
        let cfg = ExperimentConfig::from_toml_str(&format!("on_invalid_state = \"restart\"\n{CONFIG}")).unwrap();
        let mut d = driver(&dir, cfg, sim);
        d.run_once(&mut NoopObserver).unwrap();

        let summary = d.run_once(&mut NoopObserver).unwrap();
        assert_eq!((summary.continuing, summary.restarting), (1, 2));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let mut cfg = config("").simulator;
        cfg.binary = "co-run-test-no-such-simulator".into();
        let dir = tempdir().unwrap();
        let request = RunRequest {
            run_number: 1,
            work_dir:   dir.path().to_path_buf(),
            route_file: dir.path().join("r.rou.xml"),
            steps:      10,
            dump:       dir.path().join("d.xml"),
            tripinfo:   dir.path().join("t.xml"),
            edge_data:  None,
            emissions:  None,
        };
        let err = SumoProcess::new(cfg).run(&request).unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }
}

#[cfg(test)]
mod operations {
    use super::*;

    #[test]
    fn sumo_arguments_in_order() {
        let mut cfg = config("").simulator;
        cfg.extra_args = vec!["--no-step-log".into()];
        let request = RunRequest {
            run_number: 4,
            work_dir:   "work".into(),
            route_file: "work/carryover.rou.xml".into(),
            steps:      100,
            dump:       "work/netstate.xml".into(),
            tripinfo:   "work/tripinfo.xml".into(),
            edge_data:  None,
            emissions:  None,
        };
        let args = SumoProcess::new(cfg).args(&request);
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            [
                "-c", "straight.sumocfg",
                "--route-files", "work/carryover.rou.xml",
                "--netstate-dump", "work/netstate.xml",
                "--tripinfo-output", "work/tripinfo.xml",
                "--end", "100",
                "--no-step-log",
            ]
        );
    }

    #[test]
    fn plan_next_writes_nothing() {
        let dir = tempdir().unwrap();
        let d = driver(&dir, config(""), ScriptedSimulator::default());
        let prepared = d.plan_next().unwrap();

        assert_eq!(prepared.run_number, 1);
        assert!(prepared.bootstrap);
        assert_eq!(prepared.plan.len(), 3);
        assert_eq!(fs::read_dir(dir.path().join("work")).unwrap().count(), 0);
    }

    #[test]
    fn plan_next_is_deterministic() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        let a = d.plan_next().unwrap().document.to_xml().unwrap();
        let b = d.plan_next().unwrap().document.to_xml().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reset_returns_to_bootstrap_but_keeps_numbering() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        let removed = d.reset(false).unwrap();
        // latest, dump.csv, tripinfo.csv, control input, netstate.xml, tripinfo.xml
        assert_eq!(removed.len(), 6);
        assert_eq!(fs::read_dir(dir.path().join("work")).unwrap().count(), 0);

        let prepared = d.plan_next().unwrap();
        assert!(prepared.bootstrap);
        assert_eq!(prepared.run_number, 2);
    }

    #[test]
    fn purge_restarts_numbering() {
        let dir = tempdir().unwrap();
        let mut d = driver(&dir, config(""), ScriptedSimulator::with_runs(1));
        d.run_once(&mut NoopObserver).unwrap();

        d.reset(true).unwrap();
        assert_eq!(d.plan_next().unwrap().run_number, 1);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut cfg = config("");
        cfg.steps = 0;
        let dir = tempdir().unwrap();
        let result = DriverBuilder::new(cfg, ScriptedSimulator::default())
            .work_dir(dir.path().join("work"))
            .export_dir(dir.path().join("csv"))
            .build();
        assert!(matches!(result, Err(RunError::Core(_))));
    }
}
