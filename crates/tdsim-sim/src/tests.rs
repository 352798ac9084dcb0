//! Integration tests for tdsim-sim: the tick loop wired end to end.

use tdsim_core::{NodeId, SimConfig, Tick};
use tdsim_net::InMemoryTransport;
use tdsim_node::{NodeStore, NodeStoreBuilder, TickOutcome};

use crate::{SimBuilder, SimError, SimObserver};

fn test_config() -> SimConfig {
    SimConfig {
        ms_per_tick: 100,
        simulation_ticks: 1_000,
        communication_on_active_prob: 1.0,
        min_activeness_after_receive: 3,
        max_activeness_after_receive: 3,
        node_package_process_per_tick: 1,
        passiveness_death_thresh: 2,
        only_root_alive_initially: false,
        seed: 42,
        output_interval_ticks: 1,
    }
}

#[derive(Default)]
struct RecordingObserver {
    ticks_seen: Vec<Tick>,
    snapshots: usize,
    terminated_at: Option<Tick>,
}

impl SimObserver for RecordingObserver {
    fn on_tick_end(&mut self, tick: Tick, _outcomes: &[TickOutcome]) {
        self.ticks_seen.push(tick);
    }

    fn on_snapshot(&mut self, _tick: Tick, _store: &NodeStore) {
        self.snapshots += 1;
    }

    fn on_sim_end(&mut self, _final_tick: Tick, terminated_at: Option<Tick>) {
        self.terminated_at = terminated_at;
    }
}

mod builder_tests {
    use super::*;

    #[test]
    fn builds_successfully_with_defaults() {
        let cfg = test_config();
        let (store, eye) =
            NodeStoreBuilder::new(3, NodeId(0), cfg.seed).initial_liveness(vec![1, 0, 0]).build(&cfg).unwrap();
        let transport = Box::new(InMemoryTransport::new(3));
        let sim = SimBuilder::new(cfg, store, eye, transport).build().unwrap();
        assert_eq!(sim.store.count, 3);
    }

    #[test]
    fn node_count_mismatch_errors() {
        let cfg = test_config();
        let (store, _) =
            NodeStoreBuilder::new(2, NodeId(0), cfg.seed).initial_liveness(vec![1, 0]).build(&cfg).unwrap();
        let (_, eye3) =
            NodeStoreBuilder::new(3, NodeId(0), cfg.seed).initial_liveness(vec![1, 0, 0]).build(&cfg).unwrap();
        let transport = Box::new(InMemoryTransport::new(2));

        let err = SimBuilder::new(cfg, store, eye3, transport).build().unwrap_err();
        assert!(matches!(err, SimError::NodeCountMismatch { expected: 2, got: 3, .. }));
    }
}

mod run_tests {
    use super::*;

    /// A single isolated node decays to PASSIVE, exits (no children, no
    /// peers), and announces termination on the tick after that — driven
    /// entirely through the `Sim` tick loop this time, not the node store
    /// directly.
    #[test]
    fn single_node_sim_terminates_and_notifies_observer() {
        let cfg = test_config();
        let (store, eye) =
            NodeStoreBuilder::new(1, NodeId(0), cfg.seed).initial_liveness(vec![1]).build(&cfg).unwrap();
        let transport = Box::new(InMemoryTransport::new(1));
        let mut sim = SimBuilder::new(cfg, store, eye, transport).build().unwrap();

        let mut observer = RecordingObserver::default();
        sim.run(&mut observer).unwrap();

        assert_eq!(observer.terminated_at, Some(Tick(2)));
        assert_eq!(observer.ticks_seen, vec![Tick(0), Tick(1), Tick(2)]);
        assert_eq!(observer.snapshots, 3);
        assert_eq!(sim.terminated_at, Some(Tick(2)));
    }

    /// The loop stops at `config.end_tick()` when nothing ever terminates —
    /// a degenerate two-node pair that keeps re-arming each other forever
    /// under `communication_on_active_prob = 1.0` would run out the full
    /// clock rather than loop indefinitely.
    #[test]
    fn run_stops_at_end_tick_without_termination() {
        let mut cfg = test_config();
        cfg.simulation_ticks = 5;
        let (store, eye) = NodeStoreBuilder::new(2, NodeId(0), cfg.seed)
            .initial_liveness(vec![1_000, 1_000])
            .build(&cfg)
            .unwrap();
        let transport = Box::new(InMemoryTransport::new(2));
        let mut sim = SimBuilder::new(cfg.clone(), store, eye, transport).build().unwrap();

        let mut observer = RecordingObserver::default();
        sim.run(&mut observer).unwrap();

        assert_eq!(observer.ticks_seen.len(), cfg.simulation_ticks as usize);
        assert_eq!(sim.clock.current_tick, Tick(cfg.simulation_ticks));
    }

    /// `run_ticks` advances a bounded number of rounds and stops early if
    /// termination is detected within that budget.
    #[test]
    fn run_ticks_stops_early_on_termination() {
        let cfg = test_config();
        let (store, eye) =
            NodeStoreBuilder::new(1, NodeId(0), cfg.seed).initial_liveness(vec![1]).build(&cfg).unwrap();
        let transport = Box::new(InMemoryTransport::new(1));
        let mut sim = SimBuilder::new(cfg, store, eye, transport).build().unwrap();

        let mut observer = RecordingObserver::default();
        sim.run_ticks(100, &mut observer).unwrap();

        assert_eq!(sim.terminated_at, Some(Tick(2)));
        assert_eq!(observer.ticks_seen.len(), 3, "loop must stop right after termination, not run all 100");
    }
}
