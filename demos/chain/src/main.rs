//! chain — smallest example for the tdsim termination-detection simulator.
//!
//! A line of 12 nodes, only the root starting ACTIVE. The root diffuses a
//! BASIC message down the chain one hop per round, admitting each node into
//! the spanning tree as it goes, then the whole line falls PASSIVE and the
//! wave-based termination detector announces completion.

use std::path::Path;

use anyhow::Result;

use tdsim_core::{NodeId, SimConfig};
use tdsim_message::Message;
use tdsim_net::{InMemoryTransport, Transport};
use tdsim_node::NodeStoreBuilder;
use tdsim_output::{CsvWriter, StatsObserver};
use tdsim_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const NODE_COUNT: usize = 12;
const SEED: u64 = 42;
const SIMULATION_TICKS: u64 = 200;
const OUTPUT_INTERVAL_TICKS: u64 = 1;

fn main() -> Result<()> {
    println!("=== chain — tdsim termination-detection demo ===");
    println!("Nodes: {NODE_COUNT}  |  Seed: {SEED}");
    println!();

    let config = SimConfig {
        ms_per_tick: 100,
        simulation_ticks: SIMULATION_TICKS,
        communication_on_active_prob: 0.0,
        min_activeness_after_receive: 2,
        max_activeness_after_receive: 4,
        node_package_process_per_tick: 4,
        passiveness_death_thresh: 3,
        only_root_alive_initially: true,
        seed: SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };

    // Root starts with a few ticks of liveness; every other node starts
    // PASSIVE and is admitted only once the root's BASIC chain reaches it.
    let mut initial_liveness = vec![0u32; NODE_COUNT];
    initial_liveness[0] = 5;

    let (store, eye) = NodeStoreBuilder::new(NODE_COUNT, NodeId(0), config.seed)
        .initial_liveness(initial_liveness)
        .only_root_alive_initially(true)
        .build(&config)?;

    let transport = Box::new(InMemoryTransport::new(NODE_COUNT));
    let mut sim = SimBuilder::new(config.clone(), store, eye, transport).build()?;

    std::fs::create_dir_all("output/chain")?;
    let writer = CsvWriter::new(Path::new("output/chain"))?;
    let mut obs = StatsObserver::new(writer);

    // Hand-diffuse a BASIC message down the chain 0 -> 1 -> 2 -> ..., one
    // hop per round, so the spanning tree forms deterministically instead
    // of depending on randomized peer selection.
    for hop in 0..NODE_COUNT - 1 {
        let src = NodeId(hop as u32);
        let dst = NodeId((hop + 1) as u32);
        sim.transport.send(src, dst, Message::basic(src, dst))?;
        sim.run_ticks(1, &mut obs)?;
    }

    sim.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Simulation ended at tick {}", sim.clock.current_tick);
    match sim.terminated_at {
        Some(t) => println!("Termination announced at tick {t}"),
        None => println!("Termination never announced within the tick budget"),
    }
    println!();

    println!("{:<8} {:<14} {:<8} {:<8}", "Node", "Status", "InTree", "Parent");
    println!("{}", "-".repeat(40));
    for node in sim.store.node_ids() {
        let parent = sim
            .store
            .parent_of(node)
            .map(|p| p.0.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<14?} {:<8} {:<8}",
            node.0,
            sim.store.status(node),
            sim.store.in_tree(node),
            parent,
        );
    }

    Ok(())
}
