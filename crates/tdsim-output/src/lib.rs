//! `tdsim-output` — simulation output writers for the termination-detection
//! simulator.
//!
//! Writes two CSV files per run:
//!
//! | File                  | Written                          | Contents                  |
//! |------------------------|-----------------------------------|---------------------------|
//! | `tick_stats.csv`      | every tick (`on_tick_end`)        | aggregate node counts, message totals, termination flag |
//! | `node_snapshots.csv`  | every `output_interval_ticks`     | per-node lifecycle state  |
//!
//! [`CsvWriter`] is the only backend — see `DESIGN.md` for why this
//! departs from the teacher's sqlite/parquet-capable sibling.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tdsim_output::{CsvWriter, StatsObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = StatsObserver::new(writer);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::StatsObserver;
pub use row::{NodeSnapshotRow, TickStatsRow};
pub use writer::OutputWriter;
