use grapevine_types::{AudioError, MessageId};

/// Errors produced by the allocation protocol.
///
/// Exhaustion conditions never appear here: "all chains visited" and "no
/// empty message" are absorbed into [`PlayState::Complete`] and the retry
/// loop respectively. What remains is genuinely unexpected: missing
/// entities, corrupted trees, I/O.
///
/// [`PlayState::Complete`]: crate::PlayState::Complete
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The submitted payload is missing or not a WAV recording. Nothing was
    /// mutated; the player is asked to record again.
    #[error("invalid recording: {0}")]
    InvalidAudio(#[from] AudioError),

    /// A conflicting submission hit an already-filled *seed*, which has no
    /// parent to fork from. Only reachable by submitting against a stale
    /// inspect view of a freshly seeded chain.
    #[error("seed message {0} is already filled and cannot be forked")]
    SeedConflict(MessageId),

    #[error(transparent)]
    Store(#[from] grapevine_store::StoreError),

    #[error(transparent)]
    Tree(#[from] grapevine_tree::TreeError),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
