//! `NodeStore` — Structure-of-Arrays storage and the per-node tick logic.
//!
//! This is the hard part: the interleaving of tree bookkeeping, liveness
//! accounting, exit triggering and wave aggregation described by
//! [`NodeStore::tick`]. Every field below is a parallel `Vec` indexed by
//! `NodeId::index()`, mirroring `dt_agent::AgentStore`'s SoA discipline.
//! Unlike `AgentStore`, RNGs are not split into a separate struct: there is
//! no parallel tick phase here (the driver calls one node's `tick` at a
//! time), so the simultaneous-borrow problem `AgentRngs` solves doesn't
//! arise.

use std::collections::{HashSet, VecDeque};

use tdsim_core::{NodeId, NodeRng, SimConfig, Tick};
use tdsim_message::{Message, Vote};
use tdsim_net::{AllSeeingEye, Transport};

use crate::error::NodeResult;
use crate::status::{NodeStatus, TickOutcome};

/// Structure-of-Arrays storage for every node's state machine.
///
/// Every `Vec` field has exactly `count` elements; a node's `NodeId` is the
/// index into all of them. Construct via [`crate::NodeStoreBuilder`].
pub struct NodeStore {
    /// Number of nodes. Equals the length of every field below.
    pub count: usize,

    pub status: Vec<NodeStatus>,
    pub alive_for_next_ticks: Vec<u32>,
    pub passive_counter: Vec<u32>,
    pub in_tree: Vec<bool>,
    /// `NodeId::INVALID` means "no parent" (root, or exited).
    pub parent_node: Vec<NodeId>,
    pub tick_n: Vec<u64>,
    pub exited: Vec<bool>,
    pub announce_pending: Vec<bool>,
    /// Per-node scheduled stop tick. `Tick::NEVER` means "no scheduled stop".
    pub hard_stop_on_tick: Vec<Tick>,

    pub(crate) children: Vec<HashSet<NodeId>>,
    basic_queue: Vec<VecDeque<NodeId>>,
    wave_bucket: Vec<Vec<Vote>>,
    rngs: Vec<NodeRng>,

    /// Control/wave messages emitted since the last flush, accumulated by
    /// both [`NodeStore::receive`] (called between ticks) and the current
    /// [`NodeStore::tick`] call itself, then drained into the returned
    /// [`TickOutcome`].
    cms: Vec<u32>,
    wms: Vec<u32>,
}

impl NodeStore {
    /// `true` if there are no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `NodeId`s in ascending index order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.count as u32).map(NodeId)
    }

    #[inline]
    pub fn status(&self, node: NodeId) -> NodeStatus {
        self.status[node.index()]
    }

    #[inline]
    pub fn is_exited(&self, node: NodeId) -> bool {
        self.exited[node.index()]
    }

    #[inline]
    pub fn is_announcing(&self, node: NodeId) -> bool {
        self.announce_pending[node.index()]
    }

    #[inline]
    pub fn in_tree(&self, node: NodeId) -> bool {
        self.in_tree[node.index()]
    }

    #[inline]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        let p = self.parent_node[node.index()];
        (p != NodeId::INVALID).then_some(p)
    }

    #[inline]
    pub fn children_of(&self, node: NodeId) -> &HashSet<NodeId> {
        &self.children[node.index()]
    }

    #[inline]
    pub fn wave_bucket_len(&self, node: NodeId) -> usize {
        self.wave_bucket[node.index()].len()
    }

    // ── Inbound message handling (C4/C5) ───────────────────────────────────

    /// Handle one message addressed to `node`, delivered since the previous
    /// tick. Mirrors the source's `on_message_from_bottom`: this runs
    /// independently of [`NodeStore::tick`] and may itself emit messages
    /// (a CONTROL-ACK for an in-tree BASIC, a WAVE-RESP for a WAVE-REQ),
    /// whose counts accumulate into `cms`/`wms` until the next `tick` call
    /// flushes them.
    pub fn receive(
        &mut self,
        node: NodeId,
        msg: Message,
        eye: &mut AllSeeingEye,
        transport: &mut dyn Transport,
    ) -> NodeResult<()> {
        let i = node.index();
        match msg {
            Message::Basic { header } => {
                let src = header.src;
                self.basic_queue[i].push_back(src);
                if self.exited[i] {
                    // Tolerated anomaly: queued but never processed, and
                    // does not resurrect tree membership (§7).
                } else if self.in_tree[i] {
                    transport.send(node, src, Message::control_ack(node, src))?;
                    self.cms[i] += 1;
                } else {
                    self.parent_node[i] = src;
                    self.in_tree[i] = true;
                    eye.join(node);
                }
            }
            Message::ControlAck { header } => {
                self.children[i].remove(&header.src);
            }
            Message::WaveReq { tag, .. } => {
                let vote = if self.exited[i] { Vote::Finished } else { Vote::Active };
                transport.send(node, tag, Message::wave_resp(node, tag, tag, vote))?;
                self.wms[i] += 1;
            }
            Message::WaveResp { vote, .. } => {
                let needed = eye.n().saturating_sub(1);
                let bucket = &mut self.wave_bucket[i];
                bucket.push(vote);
                if bucket.len() == needed {
                    if bucket.iter().all(|v| v.is_finished()) {
                        self.announce_pending[i] = true;
                    } else {
                        bucket.clear();
                    }
                }
            }
        }
        Ok(())
    }

    // ── Tree bookkeeping (C4) ───────────────────────────────────────────────

    /// Leave the spanning tree and initiate a termination wave. Idempotent:
    /// a second call on an already-exited node does nothing.
    pub fn exit_tree(
        &mut self,
        node: NodeId,
        eye: &mut AllSeeingEye,
        transport: &mut dyn Transport,
    ) -> NodeResult<()> {
        let i = node.index();
        if self.exited[i] {
            return Ok(());
        }

        if self.in_tree[i] {
            self.in_tree[i] = false;
            let parent = self.parent_node[i];
            if parent != NodeId::INVALID {
                transport.send(node, parent, Message::control_ack(node, parent))?;
                self.cms[i] += 1;
            }
        }
        self.parent_node[i] = NodeId::INVALID;
        eye.leave(node);
        self.exited[i] = true;

        self.call_wave(node, eye, transport)?;
        Ok(())
    }

    // ── Wave engine (C5) ────────────────────────────────────────────────────

    /// Broadcast one WAVE-REQ tagged with `node`'s own id to every other
    /// node, then reset the bucket to collect the `N - 1` responses.
    ///
    /// Degenerate case: with `N == 1` there is no one to ask, so the wave is
    /// vacuously complete and `announce_pending` is set immediately rather
    /// than waiting for a WAVE-RESP that can never arrive.
    pub fn call_wave(
        &mut self,
        node: NodeId,
        eye: &mut AllSeeingEye,
        transport: &mut dyn Transport,
    ) -> NodeResult<()> {
        let i = node.index();
        let targets = eye.all_except(node);
        for target in &targets {
            transport.send(node, *target, Message::wave_req(node, *target, node))?;
            self.wms[i] += 1;
        }
        self.wave_bucket[i].clear();
        if targets.is_empty() {
            self.announce_pending[i] = true;
        }
        Ok(())
    }

    // ── Node state machine (C3) ─────────────────────────────────────────────

    /// Advance `node` by one tick. See the module-level invariants this
    /// enforces: pruning precedes the PASSIVE exit check, and the three
    /// termination predicates are checked before any PASSIVE/ACTIVE work so
    /// a dying node cannot emit new BASIC traffic.
    pub fn tick(
        &mut self,
        node: NodeId,
        cfg: &SimConfig,
        eye: &mut AllSeeingEye,
        transport: &mut dyn Transport,
    ) -> NodeResult<TickOutcome> {
        let i = node.index();

        // 1. Prune stale children.
        self.children[i].retain(|c| eye.is_alive(*c));

        // 2. Announce gate: no further work, no counter/tick_n advance.
        if self.announce_pending[i] {
            let control_messages = std::mem::take(&mut self.cms[i]);
            let wave_messages = std::mem::take(&mut self.wms[i]);
            return Ok(TickOutcome {
                status: self.status[i],
                basic_sent_to: None,
                control_messages,
                wave_messages,
                announced: true,
            });
        }

        let mut basic_sent_to = None;

        // 3. Termination conditions, checked in order.
        if self.status[i] == NodeStatus::OutOfTree {
            // Already out; nothing to do.
        } else if self.tick_n[i] >= cfg.simulation_ticks {
            self.exit_tree(node, eye, transport)?;
            self.status[i] = NodeStatus::OutOfTree;
        } else if self.passive_counter[i] >= cfg.passiveness_death_thresh {
            self.exit_tree(node, eye, transport)?;
            self.status[i] = NodeStatus::OutOfTree;
        } else if self.tick_n[i] >= self.hard_stop_on_tick[i].0 {
            self.exit_tree(node, eye, transport)?;
            self.status[i] = NodeStatus::OutOfTree;
        } else {
            match self.status[i] {
                NodeStatus::OutOfTree => unreachable!("handled by the branch above"),

                // 4. OUT_OF_CLOCK passthrough.
                NodeStatus::OutOfClock => {}

                // 5. PASSIVE branch.
                NodeStatus::Passive => {
                    if self.basic_queue[i].is_empty() {
                        if self.in_tree[i] && self.children[i].is_empty() {
                            self.exit_tree(node, eye, transport)?;
                            // Status transition to OUT_OF_TREE is deferred
                            // to the next tick's condition check.
                            self.status[i] = NodeStatus::Passive;
                        } else {
                            self.status[i] = NodeStatus::Passive;
                        }
                    } else {
                        for _ in 0..cfg.node_package_process_per_tick {
                            if self.basic_queue[i].pop_front().is_none() {
                                break;
                            }
                        }
                        self.alive_for_next_ticks[i] = self.rngs[i]
                            .gen_range(cfg.min_activeness_after_receive..=cfg.max_activeness_after_receive);
                        self.status[i] = NodeStatus::Active;
                    }
                }

                // 6. ACTIVE branch.
                NodeStatus::Active => {
                    let mut got_packages = 0usize;
                    for _ in 0..cfg.node_package_process_per_tick {
                        if self.basic_queue[i].pop_front().is_some() {
                            got_packages += 1;
                        } else {
                            break;
                        }
                    }

                    if self.rngs[i].gen_bool(cfg.communication_on_active_prob) {
                        let alive_peers = eye.alive_except(node);
                        if let Some(&peer) = self.rngs[i].choose(&alive_peers) {
                            transport.send(node, peer, Message::basic(node, peer))?;
                            self.children[i].insert(peer);
                            basic_sent_to = Some(peer);
                        }
                    }

                    self.alive_for_next_ticks[i] = self.alive_for_next_ticks[i].saturating_sub(1);
                    if self.alive_for_next_ticks[i] == 0 {
                        if got_packages > 0 {
                            self.status[i] = NodeStatus::Active;
                            self.alive_for_next_ticks[i] = self.rngs[i].gen_range(
                                cfg.min_activeness_after_receive..=cfg.max_activeness_after_receive,
                            );
                        } else {
                            self.status[i] = NodeStatus::Passive;
                        }
                    } else {
                        self.status[i] = NodeStatus::Active;
                    }
                }
            }
        }

        // 7. Counters.
        match self.status[i] {
            NodeStatus::Passive => self.passive_counter[i] += 1,
            NodeStatus::Active => self.passive_counter[i] = 0,
            NodeStatus::OutOfClock | NodeStatus::OutOfTree => {}
        }
        self.tick_n[i] += 1;

        let control_messages = std::mem::take(&mut self.cms[i]);
        let wave_messages = std::mem::take(&mut self.wms[i]);
        Ok(TickOutcome {
            status: self.status[i],
            basic_sent_to,
            control_messages,
            wave_messages,
            announced: false,
        })
    }
}

pub(crate) struct RawFields {
    pub count: usize,
    pub status: Vec<NodeStatus>,
    pub alive_for_next_ticks: Vec<u32>,
    pub passive_counter: Vec<u32>,
    pub in_tree: Vec<bool>,
    pub parent_node: Vec<NodeId>,
    pub tick_n: Vec<u64>,
    pub exited: Vec<bool>,
    pub announce_pending: Vec<bool>,
    pub hard_stop_on_tick: Vec<Tick>,
    pub children: Vec<HashSet<NodeId>>,
    pub basic_queue: Vec<VecDeque<NodeId>>,
    pub wave_bucket: Vec<Vec<Vote>>,
    pub rngs: Vec<NodeRng>,
}

impl From<RawFields> for NodeStore {
    fn from(f: RawFields) -> Self {
        NodeStore {
            count: f.count,
            status: f.status,
            alive_for_next_ticks: f.alive_for_next_ticks,
            passive_counter: f.passive_counter,
            in_tree: f.in_tree,
            parent_node: f.parent_node,
            tick_n: f.tick_n,
            exited: f.exited,
            announce_pending: f.announce_pending,
            hard_stop_on_tick: f.hard_stop_on_tick,
            children: f.children,
            basic_queue: f.basic_queue,
            wave_bucket: f.wave_bucket,
            rngs: f.rngs,
            cms: vec![0; f.count],
            wms: vec![0; f.count],
        }
    }
}
