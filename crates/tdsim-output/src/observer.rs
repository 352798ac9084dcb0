//! `StatsObserver<W>` — bridges `tdsim_sim::SimObserver` to an `OutputWriter`.

use tdsim_core::Tick;
use tdsim_node::{NodeStatus, NodeStore, TickOutcome};
use tdsim_sim::SimObserver;

use crate::row::{NodeSnapshotRow, TickStatsRow};
use crate::writer::OutputWriter;
use crate::OutputError;

fn status_label(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Active => "ACTIVE",
        NodeStatus::Passive => "PASSIVE",
        NodeStatus::OutOfClock => "OUT_OF_CLOCK",
        NodeStatus::OutOfTree => "OUT_OF_TREE",
    }
}

/// A [`SimObserver`] that writes per-node snapshots and per-tick aggregate
/// statistics to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value. After `sim.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct StatsObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> StatsObserver<W> {
    /// Create an observer backed by `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for StatsObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, outcomes: &[TickOutcome]) {
        let mut row = TickStatsRow {
            tick: tick.0,
            active_nodes: 0,
            passive_nodes: 0,
            out_of_tree_nodes: 0,
            control_messages: 0,
            wave_messages: 0,
            terminated: false,
        };
        for outcome in outcomes {
            match outcome.status {
                NodeStatus::Active => row.active_nodes += 1,
                NodeStatus::Passive => row.passive_nodes += 1,
                NodeStatus::OutOfTree => row.out_of_tree_nodes += 1,
                NodeStatus::OutOfClock => {}
            }
            row.control_messages += outcome.control_messages;
            row.wave_messages += outcome.wave_messages;
            row.terminated |= outcome.announced;
        }
        let result = self.writer.write_tick_stats(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, store: &NodeStore) {
        let rows: Vec<NodeSnapshotRow> = store
            .node_ids()
            .map(|node| NodeSnapshotRow {
                node_id: node.0,
                tick: tick.0,
                status: status_label(store.status(node)),
                in_tree: store.in_tree(node),
                exited: store.is_exited(node),
                announce_pending: store.is_announcing(node),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_node_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _terminated_at: Option<Tick>) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
