use std::fmt;

use grapevine_types::{ChainId, GameId, MessageId};

/// Why a message cannot be pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneBlock {
    /// The message carries a recording.
    HasAudio,
    /// Other messages descend from it.
    HasChildren,
}

impl fmt::Display for PruneBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasAudio => write!(f, "it has audio"),
            Self::HasChildren => write!(f, "it has children"),
        }
    }
}

/// Errors produced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("game not found: {0}")]
    GameNotFound(GameId),

    #[error("chain not found: {0}")]
    ChainNotFound(ChainId),

    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// A second parent-less message was requested for a chain that already
    /// has its seed.
    #[error("chain {chain} already has seed message {seed}")]
    SeedExists { chain: ChainId, seed: MessageId },

    /// A message's parent lives in a different chain.
    #[error("parent {parent} does not belong to chain {chain}")]
    ForeignParent { parent: MessageId, chain: ChainId },

    /// The conditional fill found the slot already taken. Expected under
    /// concurrency; the engine recovers by forking a sibling.
    #[error("message {0} is already filled")]
    AlreadyFilled(MessageId),

    /// A prune was refused. Surfaced to the admin surface as a validation
    /// error; the tree is left untouched.
    #[error("message {message} cannot be pruned: {reason}")]
    NotPrunable {
        message: MessageId,
        reason: PruneBlock,
    },

    /// A storage path escaped the media root or was otherwise malformed.
    #[error("invalid audio path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
