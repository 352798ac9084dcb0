//! Simulation observer trait for progress reporting and data collection.

use tdsim_core::Tick;
use tdsim_node::{NodeStore, TickOutcome};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, outcomes: &[TickOutcome]) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {} nodes ticked", outcomes.len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with every node's [`TickOutcome`],
    /// in ascending `NodeId` order.
    fn on_tick_end(&mut self, _tick: Tick, _outcomes: &[TickOutcome]) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks). Provides read-only access to the full node store so output
    /// writers can record a row without the sim needing to know about any
    /// specific output format.
    fn on_snapshot(&mut self, _tick: Tick, _store: &NodeStore) {}

    /// Called once after the run loop exits, whether because termination
    /// was detected or because the clock expired. `terminated_at` is the
    /// first tick at which any node's announce gate fired, if one did.
    fn on_sim_end(&mut self, _final_tick: Tick, _terminated_at: Option<Tick>) {}
}

/// A [`SimObserver`] that does nothing. Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
