//! Errors raised while assembling or driving a [`crate::Sim`].

use thiserror::Error;

use tdsim_node::NodeError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} count {got} does not match node count {expected}")]
    NodeCountMismatch { expected: usize, got: usize, what: &'static str },

    #[error(transparent)]
    Node(#[from] NodeError),
}

pub type SimResult<T> = Result<T, SimError>;
