//! stress — larger-scale throughput run for the tdsim termination-detection
//! simulator.
//!
//! Every node starts ACTIVE and chatters at its peers via
//! `communication_on_active_prob`, so the spanning tree and the wave
//! protocol both have to do real work well past the toy chain/line cases.
//!
//! Run with:
//!   cargo run -p stress --release

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use tdsim_core::{NodeId, SimConfig, Tick};
use tdsim_net::InMemoryTransport;
use tdsim_node::{NodeStatus, NodeStore, NodeStoreBuilder, TickOutcome};
use tdsim_output::{CsvWriter, StatsObserver};
use tdsim_sim::{Sim, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const NODE_COUNT: usize = 5_000;
const SEED: u64 = 1_337;
const SIMULATION_TICKS: u64 = 20_000;
const OUTPUT_INTERVAL_TICKS: u64 = 50;

struct ProgressObserver {
    inner: StatsObserver<CsvWriter>,
    start: Instant,
}

impl ProgressObserver {
    fn new(writer: CsvWriter) -> Self {
        Self { inner: StatsObserver::new(writer), start: Instant::now() }
    }
}

impl SimObserver for ProgressObserver {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, outcomes: &[TickOutcome]) {
        self.inner.on_tick_end(tick, outcomes);
        if tick.0 > 0 && tick.0 % 1_000 == 0 {
            let active = outcomes.iter().filter(|o| o.status == NodeStatus::Active).count();
            let elapsed = self.start.elapsed().as_secs_f64();
            println!(
                "  tick {:>6}  active={:>6}  elapsed={:>7.2}s  ({:.1} ticks/s)",
                tick.0,
                active,
                elapsed,
                tick.0 as f64 / elapsed.max(1e-9),
            );
        }
    }

    fn on_snapshot(&mut self, tick: Tick, store: &NodeStore) {
        self.inner.on_snapshot(tick, store);
    }

    fn on_sim_end(&mut self, final_tick: Tick, terminated_at: Option<Tick>) {
        self.inner.on_sim_end(final_tick, terminated_at);
    }
}

fn main() -> Result<()> {
    println!("=== stress — tdsim termination-detection benchmark ===");
    println!("Nodes: {NODE_COUNT}  |  Seed: {SEED}  |  Tick budget: {SIMULATION_TICKS}");
    println!();

    let config = SimConfig {
        ms_per_tick: 10,
        simulation_ticks: SIMULATION_TICKS,
        communication_on_active_prob: 0.3,
        min_activeness_after_receive: 1,
        max_activeness_after_receive: 3,
        node_package_process_per_tick: 8,
        passiveness_death_thresh: 4,
        only_root_alive_initially: false,
        seed: SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };

    let initial_liveness = vec![3u32; NODE_COUNT];

    let (store, eye) = NodeStoreBuilder::new(NODE_COUNT, NodeId(0), config.seed)
        .initial_liveness(initial_liveness)
        .build(&config)?;

    let transport = Box::new(InMemoryTransport::new(NODE_COUNT));
    let mut sim: Sim = SimBuilder::new(config.clone(), store, eye, transport).build()?;

    std::fs::create_dir_all("output/stress")?;
    let writer = CsvWriter::new(Path::new("output/stress"))?;
    let mut obs = ProgressObserver::new(writer);

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    match sim.terminated_at {
        Some(t) => println!("Termination announced at tick {t}"),
        None => println!("Termination never announced within the {SIMULATION_TICKS}-tick budget"),
    }

    Ok(())
}
