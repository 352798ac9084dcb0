//! `tdsim-sim` — tick loop orchestrator for the termination-detection
//! simulator.
//!
//! # Round structure
//!
//! ```text
//! loop:
//!   ① Deliver — drain the transport, grouped by recipient NodeId.
//!   ② Receive — feed each delivered message into NodeStore::receive.
//!   ③ Tick    — call NodeStore::tick on every node, ascending NodeId order.
//!   stop once any node's announce gate fires, or the clock expires.
//! ```
//!
//! # Crate layout
//!
//! | Module      | Contents                                      |
//! |-------------|-------------------------------------------------|
//! | [`sim`]     | `Sim` — the tick loop                          |
//! | [`builder`] | `SimBuilder` — validated construction          |
//! | [`observer`]| `SimObserver` trait, `NoopObserver`            |
//! | [`error`]   | `SimError`, `SimResult`                        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tdsim_core::NodeId;
//! use tdsim_net::InMemoryTransport;
//! use tdsim_node::NodeStoreBuilder;
//! use tdsim_sim::{NoopObserver, SimBuilder};
//!
//! let (store, eye) = NodeStoreBuilder::new(3, NodeId(0), 42)
//!     .initial_liveness(vec![5, 0, 0])
//!     .build(&cfg)?;
//! let transport = Box::new(InMemoryTransport::new(3));
//! let mut sim = SimBuilder::new(cfg, store, eye, transport).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
