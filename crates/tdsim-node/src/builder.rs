//! Fluent, validating builder for [`NodeStore`] + [`AllSeeingEye`].
//!
//! # Usage
//!
//! ```ignore
//! use tdsim_core::NodeId;
//! use tdsim_node::NodeStoreBuilder;
//!
//! let (store, eye) = NodeStoreBuilder::new(3, NodeId(0), /* seed */ 42)
//!     .initial_liveness(vec![5, 0, 0])
//!     .only_root_alive_initially(true)
//!     .build(&cfg)?;
//! ```

use std::collections::{HashSet, VecDeque};

use tdsim_core::{NodeId, NodeRng, SimConfig, Tick};
use tdsim_net::AllSeeingEye;

use crate::error::{NodeError, NodeResult};
use crate::status::NodeStatus;
use crate::store::{NodeStore, RawFields};

/// Builder for [`NodeStore`] and its paired [`AllSeeingEye`].
///
/// All SoA arrays are pre-allocated and filled with their initial values in
/// one pass; applications never push into a `NodeStore` after construction.
pub struct NodeStoreBuilder {
    n: usize,
    root: NodeId,
    seed: u64,
    initial_liveness: Option<Vec<u32>>,
    hard_stop_on_tick: Option<Vec<Tick>>,
    only_root_alive_initially: bool,
}

impl NodeStoreBuilder {
    /// Create a builder for `n` nodes rooted at `root`, seeded with
    /// `seed` for per-node RNG derivation.
    pub fn new(n: usize, root: NodeId, seed: u64) -> Self {
        Self {
            n,
            root,
            seed,
            initial_liveness: None,
            hard_stop_on_tick: None,
            only_root_alive_initially: false,
        }
    }

    /// Per-node starting `alive_for_next_ticks`. Must have exactly `n`
    /// entries. Defaults to all zero (every node starts PASSIVE) if never
    /// called.
    pub fn initial_liveness(mut self, liveness: Vec<u32>) -> Self {
        self.initial_liveness = Some(liveness);
        self
    }

    /// Per-node scheduled stop tick. Must have exactly `n` entries; use
    /// [`Tick::NEVER`] for nodes with no scheduled stop. Defaults to
    /// `Tick::NEVER` for every node if never called.
    pub fn hard_stop_on_tick(mut self, ticks: Vec<Tick>) -> Self {
        self.hard_stop_on_tick = Some(ticks);
        self
    }

    /// If `true`, every non-root node's initial liveness is forced to zero
    /// regardless of what [`Self::initial_liveness`] supplied for it.
    pub fn only_root_alive_initially(mut self, only_root: bool) -> Self {
        self.only_root_alive_initially = only_root;
        self
    }

    /// Validate `cfg` and construct the store + network view.
    ///
    /// Rejects `cfg.min_activeness_after_receive > cfg.max_activeness_after_receive`
    /// and a mismatched per-node array length before the first tick, per the
    /// "configuration error" category — negative thresholds are impossible
    /// here by construction since every threshold field is unsigned.
    pub fn build(self, cfg: &SimConfig) -> NodeResult<(NodeStore, AllSeeingEye)> {
        if cfg.min_activeness_after_receive > cfg.max_activeness_after_receive {
            return Err(NodeError::ActivenessRangeInverted {
                min: cfg.min_activeness_after_receive,
                max: cfg.max_activeness_after_receive,
            });
        }

        let n = self.n;
        let mut alive_for_next_ticks = self.initial_liveness.unwrap_or_else(|| vec![0; n]);
        if alive_for_next_ticks.len() != n {
            return Err(NodeError::WrongLength {
                field: "initial_liveness",
                expected: n,
                got: alive_for_next_ticks.len(),
            });
        }

        let hard_stop_on_tick = self.hard_stop_on_tick.unwrap_or_else(|| vec![Tick::NEVER; n]);
        if hard_stop_on_tick.len() != n {
            return Err(NodeError::WrongLength {
                field: "hard_stop_on_tick",
                expected: n,
                got: hard_stop_on_tick.len(),
            });
        }

        let mut in_tree = vec![false; n];
        let mut status = vec![NodeStatus::Passive; n];

        for idx in 0..n {
            let node = NodeId(idx as u32);
            let is_root = node == self.root;
            in_tree[idx] = is_root;
            if self.only_root_alive_initially && !is_root {
                alive_for_next_ticks[idx] = 0;
            }
            status[idx] =
                if alive_for_next_ticks[idx] > 0 { NodeStatus::Active } else { NodeStatus::Passive };
        }

        let rngs = (0..n as u32).map(|i| NodeRng::new(self.seed, NodeId(i))).collect();

        let store = NodeStore::from(RawFields {
            count: n,
            status,
            alive_for_next_ticks,
            passive_counter: vec![0; n],
            in_tree,
            parent_node: vec![NodeId::INVALID; n],
            tick_n: vec![0; n],
            exited: vec![false; n],
            announce_pending: vec![false; n],
            hard_stop_on_tick,
            children: (0..n).map(|_| HashSet::new()).collect(),
            basic_queue: (0..n).map(|_| VecDeque::new()).collect(),
            wave_bucket: (0..n).map(|_| Vec::new()).collect(),
            rngs,
        });

        let eye = AllSeeingEye::new(n, self.root);

        Ok((store, eye))
    }
}
