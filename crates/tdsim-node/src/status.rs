//! Node lifecycle status and the per-tick statistics tuple.

use tdsim_core::NodeId;

/// A node's position in its active/passive/out-of-tree lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeStatus {
    /// Has remaining work budget (`alive_for_next_ticks > 0`); may emit basic
    /// messages.
    Active,
    /// Idle: no work budget, but still a tree participant.
    Passive,
    /// Reserved terminal status for a node whose clock has been externally
    /// frozen. No transition in this state machine ever produces it — kept
    /// because the source's status enum carries it and downstream tooling
    /// (stats, plotting) switches on all four variants.
    OutOfClock,
    /// Has left the spanning tree. Terminal: [`NodeStatus::OutOfTree`] is
    /// never left once entered.
    OutOfTree,
}

/// What one [`crate::NodeStore::tick`] call produced for a single node.
///
/// Mirrors the source's per-tick return tuple
/// `(next_status, target_of_basic_sent_or_⊥, control_messages_emitted, wave_messages_emitted)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub status: NodeStatus,
    /// The peer a BASIC message was sent to this tick, if any.
    pub basic_sent_to: Option<NodeId>,
    /// CONTROL-ACK messages emitted this tick.
    pub control_messages: u32,
    /// WAVE-REQ/WAVE-RESP messages emitted this tick.
    pub wave_messages: u32,
    /// Whether this node's announce gate fired this tick (global termination
    /// proven from this node's perspective).
    pub announced: bool,
}
