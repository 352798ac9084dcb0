//! The `Sim` struct and its tick loop.

use tdsim_core::{NodeId, SimClock, SimConfig, Tick};
use tdsim_net::{AllSeeingEye, Transport};
use tdsim_node::{NodeStore, TickOutcome};

use crate::{SimObserver, SimResult};

/// The main simulation runner.
///
/// Drives the single-phase tick loop shared by every node:
///
/// 1. **Deliver**: drain the transport, grouped by recipient.
/// 2. **Receive**: feed each delivered message into [`NodeStore::receive`]
///    (may itself emit CONTROL-ACKs / WAVE-RESPs for next tick's delivery).
/// 3. **Tick**: call [`NodeStore::tick`] on every node, ascending `NodeId`
///    order, so the round is deterministic regardless of delivery order.
///
/// The round stops as soon as any node's announce gate fires — in this
/// protocol one node detecting global termination is sufficient, since the
/// wave that set its `announce_pending` already observed every other node as
/// FINISHED.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick.
    pub clock: SimClock,

    /// Per-node SoA state.
    pub store: NodeStore,

    /// Shared network view (node count, root, still-alive set).
    pub eye: AllSeeingEye,

    /// Pluggable message delivery substrate.
    pub transport: Box<dyn Transport>,

    /// The first tick at which any node announced global termination, if one
    /// has yet occurred.
    pub terminated_at: Option<Tick>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick until either termination is
    /// detected or `config.end_tick()` is reached.
    ///
    /// Calls observer hooks at every tick boundary. Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() || self.terminated_at.is_some() {
                break;
            }

            observer.on_tick_start(now);
            let outcomes = self.process_tick()?;
            if self.terminated_at.is_none() && outcomes.iter().any(|o| o.announced) {
                self.terminated_at = Some(now);
            }
            observer.on_tick_end(now, &outcomes);

            if self.config.output_interval_ticks > 0
                && now.0 % self.config.output_interval_ticks == 0
            {
                observer.on_snapshot(now, &self.store);
            }

            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_tick, self.terminated_at);
        Ok(())
    }

    /// Run exactly `n` more ticks from the current position (ignores
    /// `end_tick`), stopping early if termination is detected.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            if self.terminated_at.is_some() {
                break;
            }
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let outcomes = self.process_tick()?;
            if self.terminated_at.is_none() && outcomes.iter().any(|o| o.announced) {
                self.terminated_at = Some(now);
            }
            observer.on_tick_end(now, &outcomes);

            if self.config.output_interval_ticks > 0
                && now.0 % self.config.output_interval_ticks == 0
            {
                observer.on_snapshot(now, &self.store);
            }

            self.clock.advance();
        }
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self) -> SimResult<Vec<TickOutcome>> {
        // ── Phase 1: deliver everything queued since the previous tick ────
        let delivered = self.transport.deliver();
        for (idx, inbox) in delivered.into_iter().enumerate() {
            let node = NodeId(idx as u32);
            for msg in inbox {
                self.store.receive(node, msg, &mut self.eye, self.transport.as_mut())?;
            }
        }

        // ── Phase 2: tick every node, ascending NodeId order ──────────────
        let mut outcomes = Vec::with_capacity(self.store.count);
        for node in self.store.node_ids() {
            outcomes.push(self.store.tick(node, &self.config, &mut self.eye, self.transport.as_mut())?);
        }
        Ok(outcomes)
    }
}
