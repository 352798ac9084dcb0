//! The vote a node casts in response to a wave probe.

/// A responder's answer to a `WaveReq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vote {
    /// The responder has not yet exited the tree.
    Active,
    /// The responder has exited the tree.
    Finished,
}

impl Vote {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Vote::Finished)
    }
}
