//! The `OutputWriter` trait implemented by backend writers.

use crate::{NodeSnapshotRow, OutputResult, TickStatsRow};

/// Trait implemented by every output backend (only [`crate::CsvWriter`] for
/// now — see the module docs for why sqlite/parquet backends aren't carried
/// here).
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`StatsObserver::take_error`][crate::StatsObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of per-node snapshot rows.
    fn write_node_snapshots(&mut self, rows: &[NodeSnapshotRow]) -> OutputResult<()>;

    /// Write one aggregate tick-stats row.
    fn write_tick_stats(&mut self, row: &TickStatsRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
