//! Pluggable message delivery and the default in-memory implementation.

use tdsim_core::NodeId;
use tdsim_message::Message;

use crate::{NetError, NetResult};

/// Pluggable message-delivery substrate.
///
/// Implement this trait to replace the default in-process queueing with a
/// real socket layer, a lossy/delayed network simulator, etc. — mirroring
/// how `tdsim-sim` is agnostic to which `Transport` it's given.
///
/// # Delivery contract
///
/// - [`send`][Self::send] enqueues `message` for delivery; it does **not**
///   make the message visible to `dst` until the next [`deliver`][Self::deliver]
///   call (see §5 of the design: no message is delivered within the tick it
///   was sent in).
/// - Within a single (sender, receiver) pair, messages are delivered in
///   send order.
/// - [`deliver`][Self::deliver] is called once per tick boundary by the tick
///   driver and drains everything queued since the previous call, grouped
///   by recipient `NodeId` (index = `NodeId::index()`).
pub trait Transport {
    /// Enqueue `message` from `src` to `dst`. Returns [`NetError::UnknownNode`]
    /// if `dst` is outside `[0, N)`.
    fn send(&mut self, src: NodeId, dst: NodeId, message: Message) -> NetResult<()>;

    /// Drain everything sent since the last call, grouped by recipient.
    /// The returned `Vec` has exactly `N` entries, one per node, in
    /// ascending `NodeId` order (some may be empty).
    fn deliver(&mut self) -> Vec<Vec<Message>>;
}

/// In-process message delivery: one outbound buffer per recipient node.
///
/// Messages accumulate in `outbox[dst.index()]` in call order, which
/// trivially preserves per-(src, dst) FIFO ordering since a single sender's
/// calls are made in its own program order. Across different senders the
/// buffer may interleave messages in arbitrary order, which the node state
/// machine must (and does) tolerate.
pub struct InMemoryTransport {
    n: usize,
    outbox: Vec<Vec<Message>>,
}

impl InMemoryTransport {
    /// Create a transport for `n` nodes, all inboxes initially empty.
    pub fn new(n: usize) -> Self {
        Self { n, outbox: (0..n).map(|_| Vec::new()).collect() }
    }
}

impl Transport for InMemoryTransport {
    fn send(&mut self, _src: NodeId, dst: NodeId, message: Message) -> NetResult<()> {
        if dst.index() >= self.n {
            return Err(NetError::UnknownNode(dst));
        }
        self.outbox[dst.index()].push(message);
        Ok(())
    }

    fn deliver(&mut self) -> Vec<Vec<Message>> {
        std::mem::replace(&mut self.outbox, (0..self.n).map(|_| Vec::new()).collect())
    }
}
