//! Error type shared by the grid and the chain engine.

/// Failures that abort a query. Empty results are never errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AicError {
    /// More distinct nodes were discovered than the arena was sized for.
    #[error("node arena capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },

    /// A chain must span at least three inferences.
    #[error("chain has {edges} inference(s); at least 3 are required")]
    ChainTooShort { edges: usize },

    /// A chain must close on its first node.
    #[error("chain does not end on its first node")]
    HeadTailMismatch,

    /// Consecutive nodes are not joined by strictly alternating inferences.
    #[error("chain does not alternate strong and weak inferences")]
    NotAlternating,

    #[error("node {node} appears twice in the chain")]
    RepeatedNode { node: String },

    #[error("grid is already solved")]
    AlreadySolved,

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("search cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AicError>;
