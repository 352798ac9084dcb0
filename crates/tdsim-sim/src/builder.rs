//! Fluent builder for constructing a [`Sim`].

use tdsim_core::SimConfig;
use tdsim_net::{AllSeeingEye, Transport};
use tdsim_node::NodeStore;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, tick duration, …
/// - [`NodeStore`] + [`AllSeeingEye`] — paired output of
///   [`tdsim_node::NodeStoreBuilder::build`], so their node counts already
///   agree with each other.
/// - `transport: Box<dyn Transport>` — the delivery substrate; defaults to
///   [`tdsim_net::InMemoryTransport`] if you don't need anything fancier.
///
/// # Example
///
/// ```rust,ignore
/// let (store, eye) = NodeStoreBuilder::new(n, root, cfg.seed)
///     .initial_liveness(liveness)
///     .build(&cfg)?;
/// let transport = Box::new(InMemoryTransport::new(n));
/// let mut sim = SimBuilder::new(cfg, store, eye, transport).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    store: NodeStore,
    eye: AllSeeingEye,
    transport: Box<dyn Transport>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(
        config: SimConfig,
        store: NodeStore,
        eye: AllSeeingEye,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self { config, store, eye, transport }
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        if self.store.count != self.eye.n() {
            return Err(SimError::NodeCountMismatch {
                expected: self.store.count,
                got: self.eye.n(),
                what: "AllSeeingEye",
            });
        }

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            store: self.store,
            eye: self.eye,
            transport: self.transport,
            terminated_at: None,
        })
    }
}
