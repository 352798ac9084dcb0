//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into `TdError`
//! via `From` impls, or keep them separate and wrap `TdError` as one variant.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `tdsim-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum TdError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("message addressed to unknown node {0}")]
    UnknownNode(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `tdsim-*` crates.
pub type TdResult<T> = Result<T, TdError>;
