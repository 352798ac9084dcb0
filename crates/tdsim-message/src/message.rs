//! The `Message` enum — the four application-layer message kinds.

use tdsim_core::NodeId;

use crate::Vote;

/// Header carried by every message: who sent it, who it's addressed to.
///
/// Folded directly into each [`Message`] variant below rather than wrapped
/// around a generic payload, since every variant needs exactly `(src, dst)`
/// and nothing more — the original's separate header/payload split exists
/// to support message kinds this simulator doesn't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageHeader {
    pub src: NodeId,
    pub dst: NodeId,
}

/// One of the four semantic message kinds exchanged between nodes.
///
/// Dispatched with exhaustive `match` wherever it's handled — adding a fifth
/// kind is a compile error at every match site until it's wired in, which is
/// this target's answer to the original's runtime "unrecognised message
/// type" fatal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Application work transfer. Causes `dst` to enter ACTIVE and, if
    /// `dst` isn't already in the tree, sets `dst.parent_node = src`.
    Basic { header: MessageHeader },

    /// Acknowledges a previously received `Basic`. Causes `dst` to remove
    /// `src` from its `children` set.
    ControlAck { header: MessageHeader },

    /// A wave probe from `tag` (the wave initiator) to `header.dst`.
    WaveReq { header: MessageHeader, tag: NodeId },

    /// A response to a `WaveReq`, carrying the responder's vote.
    WaveResp { header: MessageHeader, tag: NodeId, vote: Vote },
}

impl Message {
    /// The header common to every variant.
    pub fn header(&self) -> MessageHeader {
        match self {
            Message::Basic { header }
            | Message::ControlAck { header }
            | Message::WaveReq { header, .. }
            | Message::WaveResp { header, .. } => *header,
        }
    }

    /// Convenience constructor for a basic message.
    pub fn basic(src: NodeId, dst: NodeId) -> Message {
        Message::Basic { header: MessageHeader { src, dst } }
    }

    /// Convenience constructor for a control-ack message.
    pub fn control_ack(src: NodeId, dst: NodeId) -> Message {
        Message::ControlAck { header: MessageHeader { src, dst } }
    }

    /// Convenience constructor for a wave request, tagged with `tag`
    /// (the wave's initiator), addressed `src -> dst`.
    pub fn wave_req(src: NodeId, dst: NodeId, tag: NodeId) -> Message {
        Message::WaveReq { header: MessageHeader { src, dst }, tag }
    }

    /// Convenience constructor for a wave response back to `tag`.
    pub fn wave_resp(src: NodeId, dst: NodeId, tag: NodeId, vote: Vote) -> Message {
        Message::WaveResp { header: MessageHeader { src, dst }, tag, vote }
    }
}
