//! Errors specific to node-store construction and tick execution.

use tdsim_net::NetError;
use thiserror::Error;

/// Errors raised while building or driving a [`crate::NodeStore`].
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("min_activeness_after_receive ({min}) > max_activeness_after_receive ({max})")]
    ActivenessRangeInverted { min: u32, max: u32 },

    #[error("expected {expected} entries in {field}, got {got}")]
    WrongLength { field: &'static str, expected: usize, got: usize },

    #[error(transparent)]
    Net(#[from] NetError),
}

pub type NodeResult<T> = Result<T, NodeError>;
