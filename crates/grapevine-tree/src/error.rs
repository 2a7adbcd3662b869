//! Error types for chain tree construction and selection.

use grapevine_types::{ChainId, MessageId};

/// Errors that can occur while building or querying a chain tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The chain has no messages at all. Chains are seeded at creation, so
    /// this indicates a corrupted store, not a gameplay condition.
    #[error("chain {0} has no messages")]
    EmptyChain(ChainId),

    /// No parent-less message exists in the chain.
    #[error("chain {0} has no seed message")]
    MissingSeed(ChainId),

    /// More than one parent-less message exists in the chain.
    #[error("chain {chain} has multiple seeds: {first} and {second}")]
    MultipleSeeds {
        chain: ChainId,
        first: MessageId,
        second: MessageId,
    },

    /// A message references a parent that is not in the chain.
    #[error("message {message} references missing parent {parent}")]
    DanglingParent {
        message: MessageId,
        parent: MessageId,
    },

    /// A message belongs to a different chain than the tree being built.
    #[error("message {message} belongs to chain {actual}, not {expected}")]
    ForeignMessage {
        message: MessageId,
        expected: ChainId,
        actual: ChainId,
    },

    /// A message's generation is not its parent's generation + 1.
    #[error("message {message} has generation {actual}, expected {expected}")]
    GenerationMismatch {
        message: MessageId,
        expected: u32,
        actual: u32,
    },

    /// Every slot in the chain is filled. Expected and recoverable: the
    /// allocation protocol retries with this chain excluded.
    #[error("no empty message available in chain {0}")]
    NoEmptyMessage(ChainId),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
