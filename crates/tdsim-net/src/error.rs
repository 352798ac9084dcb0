use tdsim_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("message addressed to unknown node {0}")]
    UnknownNode(NodeId),
}

pub type NetResult<T> = Result<T, NetError>;
