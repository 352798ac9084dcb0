//! `tdsim-core` — foundational types for the `tdsim` termination-detection
//! simulator.
//!
//! This crate is a dependency of every other `tdsim-*` crate. It intentionally
//! has no `tdsim-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                         |
//! |-----------|---------------------------------------------------|
//! | [`ids`]   | `NodeId`                                          |
//! | [`time`]  | `Tick`, `SimClock`, `SimConfig`                   |
//! | [`rng`]   | `NodeRng` (per-node), `SimRng` (global)           |
//! | [`error`] | `TdError`, `TdResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TdError, TdResult};
pub use ids::NodeId;
pub use rng::{NodeRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
