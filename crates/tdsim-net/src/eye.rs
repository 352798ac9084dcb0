//! `AllSeeingEye` — global network introspection shared by every node.
//!
//! Named after the original system's `AllSeeingEyeNetworkLayer`: a
//! zero-cost, always-available lookup of "how many nodes are there, who's
//! the root, and which nodes are still in the simulation" — no real routing
//! distance or failure mode involved.

use std::collections::HashSet;

use tdsim_core::NodeId;

/// Global, mutable network view: node count, root identity, and the set of
/// nodes that have not yet exited the tree.
///
/// `alive_nodes` is the universe of still-participating nodes, not a
/// tree-membership set: every node starts in it (whether or not it has
/// joined the spanning tree yet) and is removed exactly once, permanently,
/// when it calls `exit_tree`. This is what lets an ACTIVE node pick *any*
/// not-yet-exited peer to send its very first BASIC to, even before that
/// peer has ever touched the tree.
///
/// Owned by the tick driver and passed by shared reference to node logic
/// during read-only steps (peer selection, pruning) and by exclusive
/// reference during the single per-node mutating step (tree admission,
/// exit). The driver never calls two nodes' logic concurrently, so a plain
/// `HashSet` suffices; a multi-threaded driver would need to wrap this in a
/// `Mutex`/`RwLock` to preserve single-writer-per-tick semantics.
pub struct AllSeeingEye {
    /// Total number of nodes in the simulation.
    n: usize,
    /// The initiator of the diffusing computation.
    root: NodeId,
    /// Nodes that have not yet exited the tree.
    alive_nodes: HashSet<NodeId>,
}

impl AllSeeingEye {
    /// Create a new view over `n` nodes with `root` as the initiator. Every
    /// node starts alive (not exited); tree membership is tracked
    /// separately on each node (`NodeStore::in_tree`).
    pub fn new(n: usize, root: NodeId) -> Self {
        let alive_nodes = (0..n as u32).map(NodeId).collect();
        Self { n, root, alive_nodes }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn is_root(&self, node: NodeId) -> bool {
        node == self.root
    }

    /// `true` if `node` is a valid address in `[0, N)`.
    #[inline]
    pub fn is_known(&self, node: NodeId) -> bool {
        node.index() < self.n
    }

    #[inline]
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.alive_nodes.contains(&node)
    }

    /// Re-register `node` as not-yet-exited. Idempotent; every node is
    /// already alive from [`Self::new`], so this only matters if `node` had
    /// somehow been removed without having exited — kept for parity with
    /// the source's defensive membership check on tree admission.
    pub fn join(&mut self, node: NodeId) {
        self.alive_nodes.insert(node);
    }

    /// Permanently remove `node` on tree exit. Idempotent.
    pub fn leave(&mut self, node: NodeId) {
        self.alive_nodes.remove(&node);
    }

    /// All not-yet-exited nodes, excluding `node` itself. Used for ACTIVE
    /// peer selection: a node may message anyone still in the simulation,
    /// whether or not they've joined the tree yet.
    pub fn alive_except(&self, node: NodeId) -> Vec<NodeId> {
        self.alive_nodes.iter().copied().filter(|&n| n != node).collect()
    }

    /// All node ids `[0, N)` excluding `node` itself — used by the wave
    /// engine, which broadcasts to every other node regardless of tree
    /// membership.
    pub fn all_except(&self, node: NodeId) -> Vec<NodeId> {
        (0..self.n as u32).map(NodeId).filter(|&n| n != node).collect()
    }
}
