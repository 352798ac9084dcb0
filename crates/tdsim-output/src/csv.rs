//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `node_snapshots.csv`
//! - `tick_stats.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{NodeSnapshotRow, OutputResult, TickStatsRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    stats: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("node_snapshots.csv"))?;
        snapshots.write_record(["node_id", "tick", "status", "in_tree", "exited", "announce_pending"])?;

        let mut stats = Writer::from_path(dir.join("tick_stats.csv"))?;
        stats.write_record([
            "tick",
            "active_nodes",
            "passive_nodes",
            "out_of_tree_nodes",
            "control_messages",
            "wave_messages",
            "terminated",
        ])?;

        Ok(Self { snapshots, stats, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_node_snapshots(&mut self, rows: &[NodeSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.node_id.to_string(),
                row.tick.to_string(),
                row.status.to_string(),
                (row.in_tree as u8).to_string(),
                (row.exited as u8).to_string(),
                (row.announce_pending as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_stats(&mut self, row: &TickStatsRow) -> OutputResult<()> {
        self.stats.write_record(&[
            row.tick.to_string(),
            row.active_nodes.to_string(),
            row.passive_nodes.to_string(),
            row.out_of_tree_nodes.to_string(),
            row.control_messages.to_string(),
            row.wave_messages.to_string(),
            (row.terminated as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.stats.flush()?;
        Ok(())
    }
}
